use crate::opts::EncOpts;
use crate::util::{prompt_new_password, read_public_key};

use indicatif::{ProgressBar, ProgressStyle};
use sealbox_core::client::stream::SealerStreamConfig;
use sealbox_core::client::Sealer;
use sealbox_core::recipients::RecipientSet;
use sealbox_core::stream::{ReadSource, WriteSink};
use std::fs::File;

pub fn exec(enc_opts: EncOpts) {
    let mut rng = rand::thread_rng();

    let EncOpts {
        input,
        recipient,
        password,
        output,
    } = enc_opts;

    let mut recipients = RecipientSet::new();

    for path in &recipient {
        let pk = read_public_key(path);
        eprintln!(
            "Encrypting for receiver id {}",
            hex::encode(pk.receiver_id().as_bytes())
        );
        if let Err(e) = recipients.add_key(&pk) {
            eprintln!("Cannot add recipient {path}: {e}");
            std::process::exit(1);
        }
    }

    if password {
        let pw = prompt_new_password();
        recipients.add_password(&pw);
    }

    if recipients.is_empty() {
        eprintln!("No recipients; pass at least one --recipient or --password.");
        std::process::exit(1);
    }

    let output = output.unwrap_or_else(|| format!("{input}.enc"));

    let source_file = File::open(&input).unwrap();
    let destination = File::create(&output).unwrap();

    let pb = ProgressBar::new(source_file.metadata().unwrap().len());

    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec} ({eta} left)").unwrap()
        .progress_chars("#>-"));

    let mut source = ReadSource::new(pb.wrap_read(source_file));
    let mut sink = WriteSink::new(destination);

    eprintln!("Encrypting {input}...");

    Sealer::<_, SealerStreamConfig>::new(&recipients, &mut rng)
        .unwrap()
        .seal(&mut source, &mut sink)
        .unwrap();

    sink.flush().unwrap();
    pb.finish();

    eprintln!("Wrote {output}");
}
