use anyhow::Result;
use castingpulse::{NoiseConfig, PulseConfig, PulseError, PulsePipeline};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::{fs, path::Path, process::Command};
use tempfile::tempdir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const HEADER: &str =
    "posted_date,work_country,project_type,rate_value,union_status,role_billing,role_description";

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn config(min: u64) -> PulseConfig {
    PulseConfig {
        min_bucket_size: min,
        ..PulseConfig::default()
    }
}

fn write_input(dir: &Path, lines: &[String]) -> Result<std::path::PathBuf> {
    let path = dir.join("breakdowns.csv");
    let mut text = String::from(HEADER);
    text.push('\n');
    for l in lines {
        text.push_str(l);
        text.push('\n');
    }
    fs::write(&path, text)?;
    Ok(path)
}

/// A few thousand plausible rows, deterministic for a given seed.
fn synthetic_rows(seed: u64, n: usize) -> Vec<String> {
    let countries = ["USA", "Los Angeles", "London", "Berlin", "Tokyo", "Sydney", "Brazil", "Mexico City", "Atlantis", ""];
    let projects = ["Feature Film", "TV Series", "Streaming", "National Commercial", "Web Ad", "Theatre", "Music Video"];
    let billings = ["Lead", "Principal", "Supporting", "Background", "Day Player", ""];
    let unions = ["union", "non-union", "SAG-AFTRA", "", "unknown"];
    let rates = ["1000", "", "850", "$1,200/day", "TBD", "2500.50", "-1", "0"];
    let descs = [
        "A warm, kind mentor",
        "Cruel and sinister villain",
        "Seeking an AI robot voice actor",
        "",
        "Not a happy person",
        "Dentist in his 40s",
        "Very funny neighbour",
    ];
    let dates = ["2024-01-01", "2024-01-01T23:30:00-05:00", "2024-01-02 09:00:00", "2024/01/03", "bad-date", ""];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            format!(
                "{},{},{},\"{}\",{},{},\"{}\"",
                dates[rng.gen_range(0..dates.len())],
                countries[rng.gen_range(0..countries.len())],
                projects[rng.gen_range(0..projects.len())],
                rates[rng.gen_range(0..rates.len())],
                unions[rng.gen_range(0..unions.len())],
                billings[rng.gen_range(0..billings.len())],
                descs[rng.gen_range(0..descs.len())],
            )
        })
        .collect()
}

fn read_output(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

#[test]
fn three_row_feature_film_scenario() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = write_input(
        dir.path(),
        &[
            "2024-01-01,USA,Feature Film,1000,union,Lead,Dentist in his 40s".into(),
            "2024-01-01,USA,Feature Film,1100,non-union,Background,Dentist in his 40s".into(),
            "2024-01-01,USA,Feature Film,900,union,Lead,Dentist in his 40s".into(),
        ],
    )?;
    let output = dir.path().join("pulse.csv");

    let summary = PulsePipeline::new(config(3))?.run(&input, &output)?;
    assert_eq!(summary.rows_emitted, 1);

    let text = fs::read_to_string(&output)?;
    assert_eq!(
        text,
        "date_utc,region_code,proj_type_code,role_count_day,lead_share_pct_day,\
         union_share_pct_day,median_rate_day_usd,sentiment_avg_day,theme_ai_share_pct_day\n\
         2024-01-01,NA,F,3,0.7,0.7,1000,0.00,0.0\n"
    );
    Ok(())
}

#[test]
fn small_bucket_is_absent() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let mut lines: Vec<String> = (0..5)
        .map(|_| "2024-01-01,London,TV Series,800,union,Lead,".to_string())
        .collect();
    lines.push("2024-01-01,Tokyo,Feature Film,900,union,Lead,".into());
    lines.push("2024-01-01,Tokyo,Feature Film,900,union,Lead,".into());
    let input = write_input(dir.path(), &lines)?;
    let output = dir.path().join("pulse.csv");

    let summary = PulsePipeline::new(config(5))?.run(&input, &output)?;
    let rows = read_output(&output)?;
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][..3], &["2024-01-01", "EU", "T"]);
    assert_eq!(summary.buckets_suppressed, 1);
    Ok(())
}

#[test]
fn properties_hold_on_synthetic_batch() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let lines = synthetic_rows(11, 4_000);
    let input = write_input(dir.path(), &lines)?;
    let output = dir.path().join("pulse.csv");

    let min = 5;
    let summary = PulsePipeline::new(config(min))?.run(&input, &output)?;
    assert!(summary.malformed_rows > 0);
    let rows = read_output(&output)?;
    assert!(!rows.is_empty());

    let mut total = 0u64;
    for row in &rows {
        assert_eq!(row.len(), 9);
        let count: u64 = row[3].parse()?;
        assert!(count >= min);
        total += count;

        for idx in [4, 5, 8] {
            let v: f64 = row[idx].parse()?;
            assert!((0.0..=1.0).contains(&v), "share {} out of range", v);
            assert_eq!(row[idx].split('.').nth(1).map(str::len), Some(1));
        }
        if !row[6].is_empty() {
            let median: u64 = row[6].parse()?;
            assert_eq!(median % 250, 0);
        }
        let sentiment: f64 = row[7].parse()?;
        assert!((-1.0..=1.0).contains(&sentiment));
        let twentieths = sentiment * 20.0;
        assert!((twentieths - twentieths.round()).abs() < 1e-9);
        assert_ne!(row[7], "-0.00");
    }
    assert!(total <= lines.len() as u64);
    assert_eq!(total, summary.roles_emitted);

    let keys: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| (r[0].as_str(), r[1].as_str(), r[2].as_str()))
        .collect();
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1], "unsorted or duplicate: {:?}", pair);
    }
    Ok(())
}

#[test]
fn rerun_is_byte_identical() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = write_input(dir.path(), &synthetic_rows(3, 2_000))?;
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");

    PulsePipeline::new(config(5))?.run(&input, &a)?;
    let serial = PulseConfig {
        parallel_scoring: false,
        ..config(5)
    };
    PulsePipeline::new(serial)?.run(&input, &b)?;
    assert_eq!(fs::read(&a)?, fs::read(&b)?);
    Ok(())
}

#[test]
fn noisy_output_respects_floor_and_ranges() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = write_input(dir.path(), &synthetic_rows(5, 3_000))?;
    let output = dir.path().join("noisy.csv");
    let cfg = PulseConfig {
        noise: NoiseConfig {
            enabled: true,
            epsilon: 0.5,
            seed: Some(99),
        },
        ..config(10)
    };
    PulsePipeline::new(cfg.clone())?.run(&input, &output)?;
    for row in read_output(&output)? {
        assert!(row[3].parse::<u64>()? >= 10);
        for idx in [4, 5, 8] {
            assert!((0.0..=1.0).contains(&row[idx].parse::<f64>()?));
        }
    }

    // same seed, same bytes
    let again = dir.path().join("noisy2.csv");
    PulsePipeline::new(cfg)?.run(&input, &again)?;
    assert_eq!(fs::read(&output)?, fs::read(&again)?);
    Ok(())
}

#[test]
fn ai_theme_substring_policy() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let mut lines = Vec::new();
    for _ in 0..3 {
        lines.push("2024-03-01,USA,Feature Film,,union,Lead,Seeking an AI robot voice actor".to_string());
        lines.push("2024-03-01,USA,Feature Film,,union,Lead,said nothing".to_string());
    }
    let input = write_input(dir.path(), &lines)?;
    let output = dir.path().join("pulse.csv");
    PulsePipeline::new(config(1))?.run(&input, &output)?;
    let rows = read_output(&output)?;
    // "said" matches "ai" under the substring policy
    assert_eq!(rows[0][8], "1.0");
    assert_eq!(rows[0][6], "");

    let whole = PulseConfig {
        ai_match: castingpulse::KeywordMatch::WholeWord,
        ..config(1)
    };
    PulsePipeline::new(whole)?.run(&input, &output)?;
    assert_eq!(read_output(&output)?[0][8], "0.5");
    Ok(())
}

#[test]
fn parquet_output_and_summary_json() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let input = write_input(dir.path(), &synthetic_rows(8, 1_000))?;
    let output = dir.path().join("pulse.parquet");
    let summary = PulsePipeline::new(config(5))?.run(&input, &output)?;
    assert!(fs::metadata(&output)?.len() > 0);

    let json_path = dir.path().join("summary.json");
    summary.write_json(&json_path)?;
    let json: serde_json::Value = serde_json::from_slice(&fs::read(&json_path)?)?;
    assert_eq!(json["rows_read"], 1_000);
    assert_eq!(json["min_bucket_size"], 5);
    Ok(())
}

#[test]
fn fatal_errors() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let pipeline = PulsePipeline::new(config(5))?;

    let missing = dir.path().join("nope.csv");
    let out = dir.path().join("out.csv");
    let err = pipeline.run(&missing, &out).unwrap_err();
    assert!(matches!(err, PulseError::InputNotFound { .. }));
    assert!(!out.exists());

    let input = write_input(dir.path(), &synthetic_rows(1, 50))?;
    let unwritable = dir.path().join("no_such_dir").join("out.csv");
    let err = pipeline.run(&input, &unwritable).unwrap_err();
    assert!(matches!(err, PulseError::OutputWrite { .. }));
    Ok(())
}

#[test]
fn cli_exit_codes() -> Result<()> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), &synthetic_rows(2, 500))?;
    let output = dir.path().join("pulse.csv");
    let bin = env!("CARGO_BIN_EXE_castingpulse");

    let ok = Command::new(bin)
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--min-bucket-size", "3", "--no-theme-column"])
        .output()?;
    assert!(ok.status.success(), "{}", String::from_utf8_lossy(&ok.stderr));
    let header = fs::read_to_string(&output)?;
    assert_eq!(header.lines().next().map(|h| h.split(',').count()), Some(8));

    let bad = Command::new(bin)
        .arg("--input")
        .arg(dir.path().join("missing.csv"))
        .arg("--output")
        .arg(dir.path().join("x.csv"))
        .output()?;
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("input file not found"));
    Ok(())
}

#[test]
fn advertising_and_hdtv_rows_land_in_their_buckets() -> Result<()> {
    init_test_logging();
    let dir = tempdir()?;
    let mut lines = Vec::new();
    for _ in 0..2 {
        lines.push("2024-02-01,USA,Advertising Campaign,500,union,Lead,".to_string());
        lines.push("2024-02-01,USA,HDTV Pilot,700,union,Lead,".to_string());
        lines.push("2024-02-01,São Paulo,Online Advert,300,union,Lead,".to_string());
    }
    let input = write_input(dir.path(), &lines)?;
    let output = dir.path().join("pulse.csv");
    PulsePipeline::new(config(2))?.run(&input, &output)?;

    let keys: Vec<(String, String)> = read_output(&output)?
        .into_iter()
        .map(|r| (r[1].clone(), r[2].clone()))
        .collect();
    let expected = [("LA", "C"), ("NA", "C"), ("NA", "T")];
    assert_eq!(
        keys,
        expected
            .iter()
            .map(|(r, p)| (r.to_string(), p.to_string()))
            .collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn cli_help_describes_noise_and_match_flags() -> Result<()> {
    let out = Command::new(env!("CARGO_BIN_EXE_castingpulse"))
        .arg("--help")
        .output()?;
    assert!(out.status.success());
    let help = String::from_utf8_lossy(&out.stdout);
    assert!(help.contains("noise scale is 1/epsilon"));
    assert!(help.contains("reproducible runs"));
    assert!(help.contains("How AI keywords match"));
    assert!(help.contains("How project-type keywords match"));
    Ok(())
}
