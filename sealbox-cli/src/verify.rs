use crate::opts::VerifyOpts;
use crate::util::read_public_key;

use sealbox_core::artifacts::Signature;
use sealbox_core::signer;
use sealbox_core::stream::ReadSource;
use std::fs::File;

pub fn exec(verify_opts: VerifyOpts) {
    let VerifyOpts {
        input,
        signature,
        public,
    } = verify_opts;

    let pk = read_public_key(&public);

    let sig_contents = std::fs::read_to_string(&signature).unwrap_or_else(|e| {
        eprintln!("Failed to read signature {signature}: {e}");
        std::process::exit(1);
    });

    let sig: Signature = serde_json::from_str(&sig_contents).unwrap_or_else(|e| {
        eprintln!("Failed to parse signature {signature}: {e}");
        std::process::exit(1);
    });

    let mut source = ReadSource::new(File::open(&input).unwrap());

    let valid = signer::verify_source(&mut source, &sig, &pk).unwrap_or_else(|e| {
        eprintln!("Verification failed: {e}");
        std::process::exit(1);
    });

    if valid {
        println!("OK: valid signature over {input}");
    } else {
        println!("FAILED: signature does not verify over {input}");
        std::process::exit(1);
    }
}
