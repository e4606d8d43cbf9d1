use chromodoro_core::store::{self, Store};
use clap::Subcommand;

use crate::common::{Ctx, CLI_KEYS};

#[derive(Subcommand)]
pub enum DataAction {
    /// Wipe every record and return to first-run defaults
    Reset {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Reset { yes } => {
            if !yes {
                return Err("pass --yes to confirm wiping all data".into());
            }
            let ctx = Ctx::open()?;
            store::wipe_all(ctx.store.as_ref())?;
            for key in CLI_KEYS {
                ctx.store.delete(key)?;
            }
            println!("all data wiped");
        }
    }
    Ok(())
}
