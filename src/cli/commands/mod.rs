pub mod system;
pub mod views;
pub mod wallet;

use crate::cli::registry::CommandRegistry;

/// Registers every shell command in the order `help` lists them.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in wallet::definitions()
        .into_iter()
        .chain(views::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
