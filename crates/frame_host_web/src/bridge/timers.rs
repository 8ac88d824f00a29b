use futures::future::LocalBoxFuture;

pub(crate) fn sleep_ms(duration_ms: u64) -> LocalBoxFuture<'static, ()> {
    super::interop::sleep_ms(duration_ms)
}

pub(crate) fn spawn_local(task: LocalBoxFuture<'static, ()>) {
    super::interop::spawn_local(task)
}
