use rand::{rngs::OsRng, RngCore};

const ID_BYTES: usize = 8;

/// Produces identifiers for new timers. Any `Fn() -> String` works, which lets tests hand out
/// predictable ids.
pub trait IdGenerator: Send + Sync + 'static {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync + 'static,
{
    fn generate(&self) -> String {
        self()
    }
}

/// 8 bytes from the operating system's secure random source rendered as 16 lowercase hex
/// characters.
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
