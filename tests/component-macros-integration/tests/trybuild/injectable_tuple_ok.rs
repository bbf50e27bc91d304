use component_macros::Injectable;
use di_abstractions::Injectable as _;
use std::sync::Arc;

#[derive(Debug)]
struct Clock;

#[derive(Injectable)]
struct Timer(#[inject] Arc<Clock>, #[value("timer.interval_ms")] u64);

fn main() {
    let _ = Timer::inject;
}
