use crate::opts::DecOpts;
use crate::util::{prompt_password, read_private_key};

use indicatif::{ProgressBar, ProgressStyle};
use sealbox_core::client::stream::UnsealerStreamConfig;
use sealbox_core::client::Unsealer;
use sealbox_core::stream::{ReadSource, WriteSink};
use std::fs::File;

pub fn exec(dec_opts: DecOpts) {
    let DecOpts {
        input,
        key,
        password,
        output,
    } = dec_opts;

    let file_ext = format!(".{}", "enc");

    let out_file_name = match output {
        Some(o) => o,
        None => {
            if input.ends_with(&file_ext) {
                input[..input.len() - file_ext.len()].to_string()
            } else {
                eprintln!("Input file name does not end with .enc; pass --output.");
                std::process::exit(1);
            }
        }
    };

    eprintln!("Opening {input}");

    let source_file = File::open(&input).unwrap();

    let pb = ProgressBar::new(source_file.metadata().unwrap().len());
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec} ({eta} left)").unwrap()
        .progress_chars("#>-"));

    let source = ReadSource::new(pb.wrap_read(source_file));

    let unsealer = Unsealer::<_, UnsealerStreamConfig>::new(source).unwrap_or_else(|e| {
        eprintln!("Not a Sealbox envelope: {e}");
        std::process::exit(1);
    });

    eprintln!("Sealbox format version: {:#?}", unsealer.version);
    eprintln!(
        "Header: {}",
        serde_json::to_string_pretty(&unsealer.header).unwrap()
    );

    let destination = File::create(&out_file_name).unwrap();
    let mut sink = WriteSink::new(destination);

    eprintln!("Decrypting {input}...");

    let result = if let Some(key_path) = key {
        let sk = read_private_key(&key_path);
        unsealer.unseal(&sk.receiver_id(), &sk, &mut sink)
    } else if password {
        let pw = prompt_password();
        unsealer.unseal_with_password(&pw, &mut sink)
    } else {
        eprintln!("Pass either --key or --password.");
        std::process::exit(1);
    };

    let params = result.unwrap_or_else(|e| {
        eprintln!("Decryption failed: {e}");
        std::process::exit(1);
    });

    sink.flush().unwrap();
    pb.finish();

    if !params.is_empty() {
        eprintln!("Custom parameters:");
        for (k, v) in params.iter() {
            eprintln!("  {k}: {}", hex::encode(v));
        }
    }

    eprintln!("Wrote {out_file_name}");
}
