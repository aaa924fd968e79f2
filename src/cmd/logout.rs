use anyhow::Result;
use async_trait::async_trait;
use clap::Args;

use super::{ConfigArgs, RunCommand};

/// Remove the stored credential. No server call is involved; the token
/// simply stops being sent.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        factory.logout()?;
        println!("Logged out");
        Ok(())
    }
}
