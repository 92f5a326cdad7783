use anyhow::Result;

/// The cli drives the timer manager from a single thread, the same way an interactive event loop
/// would.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
