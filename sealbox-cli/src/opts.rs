use clap::{Parser, ValueHint};

/// Command line interface for Sealbox, a multi-recipient envelope
/// encryption tool.
#[derive(Parser, Debug)]
#[clap(name = "sealbox", version = "0.2")]
pub struct Opts {
    #[clap(subcommand)]
    pub subcmd: Subcommand,
}

#[derive(Parser, Debug)]
pub enum Subcommand {
    Keygen(KeygenOpts),
    Enc(EncOpts),
    Dec(DecOpts),
    Sign(SignOpts),
    Verify(VerifyOpts),
}

/// Generate a key pair.
#[derive(Parser, Debug)]
#[clap(name = "Keygen")]
pub struct KeygenOpts {
    /// Output base name; writes <out>.pub and <out>.key.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub out: String,

    /// Protect the private key file with a password.
    #[clap(short, long)]
    pub password: bool,
}

/// Encrypt a file.
#[derive(Parser, Debug)]
#[clap(name = "Encrypt")]
pub struct EncOpts {
    /// Input file.
    #[clap(index = 1)]
    pub input: String,

    /// Public key file of a recipient; may be given multiple times.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub recipient: Vec<String>,

    /// Also add a password recipient (prompts for the password).
    #[clap(short, long)]
    pub password: bool,

    /// Output file; defaults to <input>.enc.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<String>,
}

/// Decrypt a file.
#[derive(Parser, Debug)]
#[clap(name = "Decrypt")]
pub struct DecOpts {
    /// Input file.
    #[clap(index = 1)]
    pub input: String,

    /// Private key file.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub key: Option<String>,

    /// Decrypt as a password recipient (prompts for the password).
    #[clap(short, long)]
    pub password: bool,

    /// Output file; defaults to <input> without its .enc extension.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<String>,
}

/// Sign a file, producing a detached signature.
#[derive(Parser, Debug)]
#[clap(name = "Sign")]
pub struct SignOpts {
    /// Input file.
    #[clap(index = 1)]
    pub input: String,

    /// Private key file.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub key: String,

    /// Output file; defaults to <input>.sig.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<String>,
}

/// Verify a detached signature.
#[derive(Parser, Debug)]
#[clap(name = "Verify")]
pub struct VerifyOpts {
    /// Input file.
    #[clap(index = 1)]
    pub input: String,

    /// Detached signature file.
    #[clap(short, long, value_hint = ValueHint::FilePath)]
    pub signature: String,

    /// Public key file of the signer.
    #[clap(short = 'P', long, value_hint = ValueHint::FilePath)]
    pub public: String,
}
