use once_cell::sync::OnceCell;

static LOGGER: OnceCell<()> = OnceCell::new();

/// Routes `log` records to the browser console. Only the first call's level
/// takes effect; later calls are no-ops.
pub fn init(level: log::Level) {
    LOGGER.get_or_init(|| {
        // Another logger may already be installed by the embedding page.
        let _ = console_log::init_with_level(level);
    });
}
