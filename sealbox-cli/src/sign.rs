use crate::opts::SignOpts;
use crate::util::read_private_key;

use indicatif::{ProgressBar, ProgressStyle};
use sealbox_core::signer;
use sealbox_core::stream::ReadSource;
use std::fs::File;

pub fn exec(sign_opts: SignOpts) {
    let SignOpts { input, key, output } = sign_opts;

    let sk = read_private_key(&key);

    let source_file = File::open(&input).unwrap();

    let pb = ProgressBar::new(source_file.metadata().unwrap().len());
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {binary_bytes_per_sec} ({eta} left)").unwrap()
        .progress_chars("#>-"));

    let mut source = ReadSource::new(pb.wrap_read(source_file));

    eprintln!("Signing {input}...");

    let sig = signer::sign_source(&mut source, &sk).unwrap_or_else(|e| {
        eprintln!("Signing failed: {e}");
        std::process::exit(1);
    });

    pb.finish();

    let output = output.unwrap_or_else(|| format!("{input}.sig"));
    std::fs::write(&output, serde_json::to_string(&sig).unwrap()).unwrap();

    eprintln!("Wrote {output}");
}
