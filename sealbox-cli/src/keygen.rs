use crate::opts::KeygenOpts;
use crate::util::{prompt_new_password, KeyFile};

use sealbox_core::artifacts::{KeyPair, PublicKeySource};

pub fn exec(keygen_opts: KeygenOpts) {
    let mut rng = rand::thread_rng();

    let KeygenOpts { out, password } = keygen_opts;

    let pair = KeyPair::generate(&mut rng);

    let pub_path = format!("{out}.pub");
    let key_path = format!("{out}.key");

    std::fs::write(&pub_path, serde_json::to_string(pair.public()).unwrap()).unwrap();

    let key_file = if password {
        let pw = prompt_new_password();
        KeyFile::Protected(pair.private().protect(&pw, &mut rng))
    } else {
        KeyFile::Plain(pair.private().clone())
    };

    std::fs::write(&key_path, serde_json::to_string(&key_file).unwrap()).unwrap();

    eprintln!("Wrote {pub_path} and {key_path}");
    println!(
        "Receiver id: {}",
        hex::encode(pair.receiver_id().as_bytes())
    );
}
