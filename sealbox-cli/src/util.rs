use inquire::Password;
use sealbox_core::artifacts::{PrivateKey, ProtectedPrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

/// On-disk private key: either the raw material or a password-protected
/// wrapping of it.
#[derive(Serialize, Deserialize)]
pub(crate) enum KeyFile {
    Plain(PrivateKey),
    Protected(ProtectedPrivateKey),
}

pub(crate) fn read_public_key(path: &str) -> PublicKey {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read public key {path}: {e}");
        std::process::exit(1);
    });

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Failed to parse public key {path}: {e}");
        std::process::exit(1);
    })
}

pub(crate) fn read_private_key(path: &str) -> PrivateKey {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read private key {path}: {e}");
        std::process::exit(1);
    });

    let key_file: KeyFile = serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Failed to parse private key {path}: {e}");
        std::process::exit(1);
    });

    match key_file {
        KeyFile::Plain(key) => key,
        KeyFile::Protected(protected) => {
            let password = Password::new("Key password:")
                .without_confirmation()
                .prompt()
                .unwrap();

            protected.open(&password).unwrap_or_else(|e| {
                eprintln!("Failed to open private key: {e}");
                std::process::exit(1);
            })
        }
    }
}

pub(crate) fn prompt_new_password() -> String {
    Password::new("Password:").prompt().unwrap()
}

pub(crate) fn prompt_password() -> String {
    Password::new("Password:").without_confirmation().prompt().unwrap()
}
