use frame_host::EnvironmentSignals;

pub(crate) fn environment_signals() -> EnvironmentSignals {
    super::interop::environment_signals()
}
