use anyhow::{bail, Context};
use num_bigint::BigUint;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shamir::{reconstruct_records, split, ShareRecord};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (secret, num_shares, threshold) = match args.as_slice() {
        [] => ("1234", "5", "3"),
        [s, n, k] => (s.as_str(), n.as_str(), k.as_str()),
        _ => bail!("usage: shamir [secret num_shares threshold]"),
    };

    let set = split(secret, num_shares, threshold).context("failed to split secret")?;
    println!("Prime: {}", set.prime());
    println!("Shares:");
    for share in set.shares() {
        println!("x = {}, fx = {}", share.x, share.y);
    }

    let k: usize = threshold.parse()?;
    let records: Vec<ShareRecord> = set.records().into_iter().take(k).collect();
    let recovered = reconstruct_records(&records).context("failed to recover secret")?;
    println!("Recovered Secret: {}", recovered);

    let expected: BigUint = secret.parse()?;
    if recovered != expected {
        bail!("recovered secret does not match");
    }
    Ok(())
}
