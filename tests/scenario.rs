use std::f64::consts::PI;
use driven_box::{
    config::{ Config, RunOptions },
    diagnostics,
    output::{ self, RECORDS_FILE, SNAPSHOT_FILE },
    Grid,
    Params,
    Record,
    Simulation,
    WaveFunction,
};

fn undriven(eigenstate: usize, dt: f64, horizon: f64) -> Params {
    Params { eigenstate, strength: 0.0, dt, horizon, ..Params::default() }
}

fn max_drift<F>(records: &[Record], f: F) -> f64
where F: Fn(&Record) -> f64
{
    let f0 = f(&records[0]);
    records.iter()
        .map(|rec| ((f(rec) - f0) / f0).abs())
        .fold(0.0, f64::max)
}

#[test]
fn norm_conserved_without_drive() {
    for n in [1, 2] {
        let mut sim = Simulation::new(undriven(n, 1e-5, 2e-2)).unwrap()
            .with_record_every(50).unwrap();
        let records: Vec<Record> = sim.records().collect();
        assert_eq!(records.len(), 40);
        let drift = max_drift(&records, |rec| rec.norm);
        assert!(drift < 1e-6, "n = {}: norm drift {}", n, drift);
    }

    let mut sim = Simulation::new(undriven(1, 1e-4, 0.5)).unwrap()
        .with_record_every(100).unwrap();
    let records: Vec<Record> = sim.records().collect();
    let drift = max_drift(&records, |rec| rec.norm);
    assert!(drift < 1e-6, "default dt: norm drift {}", drift);
}

#[test]
fn eigenstate_is_stationary_without_drive() {
    for n in [1, 2] {
        let mut sim = Simulation::new(undriven(n, 1e-5, 2e-2)).unwrap()
            .with_record_every(50).unwrap();
        let records: Vec<Record> = sim.records().collect();
        let drift = max_drift(&records, |rec| rec.avg_position);
        assert!(drift < 1e-6, "n = {}: <x> drift {}", n, drift);
        // recorded energies pair the real part with the action from before
        // the last half kick, an offset of at most dt·E/4 relative
        let dt = sim.params().dt;
        let e0 = records[0].energy;
        let drift = max_drift(&records, |rec| rec.energy);
        assert!(drift < dt * e0, "n = {}: energy drift {}", n, drift);
        assert!((sim.population(n) - 1.0).abs() < 1e-6);
    }
}

#[test]
fn walls_vanish_at_every_record() {
    let params = Params { eigenstate: 2, horizon: 5e-2, ..Params::default() };
    let mut sim = Simulation::new(params).unwrap();
    let mut count = 0;
    loop {
        let psi = sim.state();
        let n = psi.len();
        assert_eq!(psi.re()[0], 0.0);
        assert_eq!(psi.re()[n - 1], 0.0);
        assert_eq!(psi.im()[0], 0.0);
        assert_eq!(psi.im()[n - 1], 0.0);
        if sim.advance().is_none() { break; }
        count += 1;
    }
    assert_eq!(count, 500);
}

#[test]
fn initial_condition() {
    let sim = Simulation::new(Params::default()).unwrap();
    let grid = Grid::new(101).unwrap();
    assert_eq!(sim.grid(), &grid);
    let psi = sim.state();
    for i in 1..100 {
        let x = grid.positions()[i];
        assert!((psi.re()[i] - 2.0_f64.sqrt() * (PI * x).sin()).abs() < 1e-14);
    }
    assert!(psi.im().iter().all(|&v| v == 0.0));
    assert_eq!(psi, &WaveFunction::eigenstate(&grid, 1).unwrap());
}

#[test]
fn runs_are_deterministic() {
    let params = Params { horizon: 5e-2, ..Params::default() };
    let a: Vec<Record>
        = Simulation::new(params).unwrap()
        .records().collect();
    let b: Vec<Record>
        = Simulation::new(params).unwrap()
        .records().collect();
    assert_eq!(a.len(), 500);
    assert!(
        a.iter().zip(&b).all(|(ra, rb)| {
            ra.time.to_bits() == rb.time.to_bits()
                && ra.norm.to_bits() == rb.norm.to_bits()
                && ra.avg_position.to_bits() == rb.avg_position.to_bits()
                && ra.energy.to_bits() == rb.energy.to_bits()
        })
    );
}

#[test]
fn resonant_drive_pumps_energy() {
    let params = Params { horizon: 2.0, ..Params::default() };
    let mut sim = Simulation::new(params).unwrap()
        .with_record_every(1000).unwrap();
    let records: Vec<Record> = sim.records().collect();
    assert_eq!(records.len(), 20);

    let first = records[0];
    assert_eq!(first.time, 0.0);
    assert!((first.norm - 1.0).abs() < 1e-3);
    assert!((first.avg_position - 0.5).abs() < 1e-3);
    assert!((first.energy - PI * PI / 2.0).abs() < 1e-3);

    let last = records[records.len() - 1];
    assert!(
        last.energy > first.energy + 0.2,
        "energy {} -> {}", first.energy, last.energy,
    );
    let mean = |recs: &[Record]| {
        recs.iter().map(|rec| rec.energy).sum::<f64>() / recs.len() as f64
    };
    assert!(mean(&records[10..]) > mean(&records[..10]));
    assert!(records.iter().all(|rec| (rec.norm - 1.0).abs() < 1e-6));

    // population moves from the ground state into the first excited state
    assert!(sim.population(2) > 0.01);
    assert!(sim.population(1) < 0.99);
    let psi = sim.into_state();
    let grid = Grid::new(101).unwrap();
    let total: f64 = (1..=10).map(|m| diagnostics::population(&psi, &grid, m)).sum();
    assert!((total - 1.0).abs() < 1e-3);
}

#[test]
fn full_run_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        params: Params { horizon: 1e-2, ..Params::default() },
        run: RunOptions {
            record_every: 10,
            norm_tolerance: Some(1e-3),
            outdir: dir.path().join("nested/out"),
            snapshot: true,
            ..RunOptions::default()
        },
    };
    let summary = output::run(&config).unwrap();
    assert_eq!(summary.steps, 100);
    assert_eq!(summary.records, 10);
    assert_eq!(summary.diverged, None);

    let outdir = dir.path().join("nested/out");
    let text = std::fs::read_to_string(outdir.join(RECORDS_FILE)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|line| line.split_whitespace().count() == 4));
    assert_eq!(lines[0], summary.first.unwrap().to_string());
    assert_eq!(lines[9], summary.last.unwrap().to_string());

    let meta = std::fs::metadata(outdir.join(SNAPSHOT_FILE)).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn run_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let outdir = dir.path().join("toml_out");
    let text = format!(
        "[params]\n\
        points = 51\n\
        horizon = 1e-2\n\
        \n\
        [run]\n\
        record_every = 25\n\
        parallel = true\n\
        snapshot = false\n\
        outdir = {:?}\n",
        outdir.display().to_string(),
    );
    let path = dir.path().join("driven_box.toml");
    std::fs::write(&path, text).unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.params.points, 51);
    assert!(config.run.parallel);

    let summary = output::run(&config).unwrap();
    assert_eq!(summary.records, 4);
    assert!(outdir.join(RECORDS_FILE).is_file());
    assert!(!outdir.join(SNAPSHOT_FILE).exists());
}
