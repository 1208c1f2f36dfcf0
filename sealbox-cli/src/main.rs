mod decrypt;
mod encrypt;
mod keygen;
mod opts;
mod sign;
mod util;
mod verify;

use crate::opts::{Opts, Subcommand};
use clap::Parser;

fn main() {
    let opts = Opts::parse();

    match opts.subcmd {
        Subcommand::Keygen(o) => crate::keygen::exec(o),
        Subcommand::Enc(o) => crate::encrypt::exec(o),
        Subcommand::Dec(o) => crate::decrypt::exec(o),
        Subcommand::Sign(o) => crate::sign::exec(o),
        Subcommand::Verify(o) => crate::verify::exec(o),
    }
}
