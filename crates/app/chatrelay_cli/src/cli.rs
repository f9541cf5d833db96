use chatrelay_client::gateway::DEFAULT_GATEWAY_URL;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chatrelay", about = "Chat with a generative model through the chatrelay gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one prompt and print the reply.
    Chat {
        /// The prompt text.
        prompt: String,

        /// Stream the reply as it is generated.
        #[arg(long)]
        stream: bool,

        /// Gateway base URL.
        #[arg(long, env = "CHATRELAY_URL", default_value = DEFAULT_GATEWAY_URL)]
        server: String,
    },

    /// Print the version.
    Version,
}
