/// Global time source advanced by the timer thread.
///
/// Each call moves the clock forward to "now" and fires whatever time-driven work
/// became due. The timer calls it once per tick, from a single thread.
pub trait Clock: Send + Sync {
    fn advance(&self);
}
