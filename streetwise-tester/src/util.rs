use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use streetwise_game::GameMode;

use crate::policy::Strategy;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse `normal,chaos` style lists; `all` expands to every mode.
pub fn parse_modes(arg: &str) -> Result<Vec<GameMode>> {
    let mut modes = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            modes.extend(GameMode::ALL);
            continue;
        }
        let Ok(mode) = token.parse::<GameMode>() else {
            bail!("Unknown mode: {token}");
        };
        modes.push(mode);
    }
    modes.dedup();
    if modes.is_empty() {
        bail!("No modes selected");
    }
    Ok(modes)
}

pub fn parse_strategies(arg: &str) -> Result<Vec<Strategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(arg) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(Strategy::ALL);
            continue;
        }
        let Ok(strategy) = token.parse::<Strategy>() else {
            bail!("Unknown strategy: {token}");
        };
        strategies.push(strategy);
    }
    strategies.dedup();
    if strategies.is_empty() {
        bail!("No strategies selected");
    }
    Ok(strategies)
}

/// Base seeds from the CLI. Negative integers fold onto their magnitude.
pub fn parse_seeds(arg: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(arg) {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            bail!("Unrecognized seed token: {token}");
        }
    }
    if seeds.is_empty() {
        seeds.push(1337);
    }
    Ok(seeds)
}

pub enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    pub fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    pub fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn modes_accept_aliases_and_all() {
        assert_eq!(
            parse_modes("normal, fentanyl").expect("modes"),
            vec![GameMode::Normal, GameMode::Chaos]
        );
        assert_eq!(parse_modes("all").expect("modes"), GameMode::ALL.to_vec());
        assert!(parse_modes("hard").is_err());
        assert!(parse_modes(" , ").is_err());
    }

    #[test]
    fn strategies_reject_unknown_names() {
        assert_eq!(
            parse_strategies("random,cautious").expect("strategies"),
            vec![Strategy::Random, Strategy::Cautious]
        );
        assert!(parse_strategies("cautious,yolo").is_err());
    }

    #[test]
    fn seeds_default_and_fold_negatives() {
        assert_eq!(parse_seeds("").expect("seeds"), vec![1337]);
        assert_eq!(parse_seeds("7,-7").expect("seeds"), vec![7, 7]);
        assert!(parse_seeds("SEED").is_err());
    }

    #[test]
    fn file_target_writes_through() {
        let path = std::env::temp_dir().join(format!(
            "streetwise-output-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        let mut target = OutputTarget::new(Some(path.clone())).expect("create");
        writeln!(target, "hello").expect("write");
        target.flush_inner().expect("flush");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello\n");
        let _ = std::fs::remove_file(path);
    }
}
