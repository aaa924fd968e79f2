use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::Args;
use console::style;

use crate::client::RequestError;

use super::{ConfigArgs, RunCommand};

/// Login to the server and save the credential locally.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let factory = self.config.build_factory()?;
        let user = match factory
            .login(self.email.clone(), self.password.clone())
            .await
        {
            Ok(user) => user,
            // Friendlier text for the well-known rejections
            Err(err) => match err.downcast_ref::<RequestError>() {
                Some(RequestError::Status { code: 401, .. })
                | Some(RequestError::Status { code: 403, .. }) => {
                    bail!("invalid email or password")
                }
                Some(RequestError::Status { code: 400, .. }) => {
                    bail!("the server rejected the login request, check the email format")
                }
                _ => return Err(err),
            },
        };

        println!(
            "Logged in as {} ({})",
            style(&user.name).green().bold(),
            user.merchant
        );
        Ok(())
    }
}
