use component_macros::Injectable;
use di_abstractions::Injectable as _;
use std::sync::Arc;

trait Sink: Send + Sync {}

#[derive(Debug, Default)]
struct Pool;

#[derive(Injectable)]
struct Service {
    #[inject]
    pool: Arc<Pool>,
    #[inject(name = "replica")]
    replica: Arc<Pool>,
    #[inject]
    sink: Arc<dyn Sink>,
    #[inject(all = "^audit")]
    audits: Vec<Arc<dyn Sink>>,
    #[value("service.port")]
    port: u16,
    #[value("service.region", optional)]
    region: String,
    counter: usize,
}

#[derive(Injectable)]
struct Empty;

fn main() {
    let _ = Service::inject;
    let _ = Empty::inject;
}
