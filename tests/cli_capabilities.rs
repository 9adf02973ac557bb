use assert_cmd::Command;
use assert_fs::prelude::*;

fn run_cli(args: &[&str], stdin_data: Option<&str>) -> String {
    let mut cmd = Command::cargo_bin("tdigest").expect("cli binary");
    cmd.args(args);
    if let Some(data) = stdin_data {
        cmd.write_stdin(data);
    }
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out)
        .expect("utf8 output")
        .trim()
        .to_string()
}

#[test]
fn cli_median_from_stdin() {
    let out = run_cli(&["median"], Some("0 1 2 3"));
    let median = out.parse::<f64>().expect("median output");
    assert!((median - 1.5).abs() <= 1e-12);
}

#[test]
fn cli_quantile_accepts_mixed_separators() {
    let out = run_cli(&["quantile", "--q", "1"], Some("4,\n-2; 9 3"));
    assert_eq!(out.parse::<f64>().expect("q output"), 9.0);
    let out = run_cli(&["quantile", "--q", "0"], Some("4,\n-2; 9 3"));
    assert_eq!(out.parse::<f64>().expect("q output"), -2.0);
}

#[test]
fn cli_centroids_are_ascending_and_conserve_weight() {
    let data: String = (0..2_000).map(|i| format!("{}\n", (i * 37) % 2_000)).collect();
    for mode in ["merge", "cluster"] {
        let out = run_cli(&["--mode", mode, "--delta", "50", "centroids"], Some(&data));
        let rows: Vec<(f64, f64)> = out
            .lines()
            .map(|line| {
                let (m, w) = line.split_once('\t').expect("tsv row");
                (m.parse().expect("mean"), w.parse().expect("weight"))
            })
            .collect();
        assert!(rows.len() > 1 && rows.len() < 2_000, "mode={mode}");
        assert!(rows.windows(2).all(|w| w[0].0 < w[1].0), "mode={mode}");
        let total: f64 = rows.iter().map(|r| r.1).sum();
        assert_eq!(total, 2_000.0, "mode={mode}");
    }
}

#[test]
fn cli_reads_input_file() {
    let td = assert_fs::TempDir::new().expect("temp dir");
    let input = td.child("points.txt");
    let data: String = (0..=1_000).map(|i| format!("{} ", i as f64 / 100.0)).collect();
    input.write_str(&data).expect("write input");

    let out = run_cli(
        &[
            "--scale",
            "k0",
            "--input",
            input.path().to_str().expect("input path"),
            "median",
        ],
        None,
    );
    let median = out.parse::<f64>().expect("median output");
    assert!((median - 5.0).abs() <= 0.1, "median={median}");
}

#[test]
fn cli_rejects_out_of_range_q() {
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["quantile", "--q", "1.5"])
        .write_stdin("1 2 3")
        .assert()
        .code(2);
}

#[test]
fn cli_fails_on_empty_input_and_bad_numbers() {
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .arg("median")
        .write_stdin("")
        .assert()
        .failure();
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .arg("median")
        .write_stdin("1 two 3")
        .assert()
        .failure();
    Command::cargo_bin("tdigest")
        .expect("cli binary")
        .args(["--delta", "0", "median"])
        .write_stdin("1 2 3")
        .assert()
        .failure();
}
