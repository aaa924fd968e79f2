use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;

use crate::display::display_json;

use super::{ConfigArgs, RunCommand};

/// Display info of the currently logged-in user.
#[derive(Args)]
pub struct WhoamiArgs {
    /// Use the locally cached user blob without calling the server.
    #[arg(long)]
    pub cached: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for WhoamiArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;

        if self.cached {
            match factory.cached_user() {
                Some(user) => return display_json(user),
                None => bail!("no cached user, login first"),
            }
        }

        let client = factory.build_client()?;
        let user = client.me().await?;
        display_json(user)
    }
}
