//! ngspice adapter (primary backend).
//!
//! Invokes ngspice in batch mode (`-b -o <log>`) and parses the
//! fixed-column `.print` tables from the log. Every converted macromodel
//! and plain-SPICE3 netlist is guaranteed to run here.

use std::path::PathBuf;

use dialect_core::{
    AcGainParams, AcSweepParams, BackendId, GainResult, NoiseParams, NoisePoint, NoiseResult,
    SweepPoint, SweepResult,
};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::runner::{invoke, probe, with_directives, SolverRun};

pub struct NgspiceBackend {
    config: BackendConfig,
}

impl NgspiceBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn run(&self, deck: String) -> Result<SolverRun> {
        invoke(
            BackendId::Ngspice.as_str(),
            &self.config,
            &deck,
            "ngspice.log",
            |netlist, output| {
                vec![
                    PathBuf::from("-b"),
                    PathBuf::from("-o"),
                    output.to_path_buf(),
                    netlist.to_path_buf(),
                ]
            },
        )
    }

    fn log_text(run: &SolverRun) -> Result<&str> {
        run.output_file.as_deref().ok_or_else(|| Error::SolverFailed {
            backend: BackendId::Ngspice.as_str().to_string(),
            diagnostics: "ngspice produced no log file".to_string(),
        })
    }
}

impl Default for NgspiceBackend {
    fn default() -> Self {
        Self::new(BackendConfig::ngspice())
    }
}

impl crate::SpiceBackend for NgspiceBackend {
    fn id(&self) -> BackendId {
        BackendId::Ngspice
    }

    fn is_available(&self) -> bool {
        probe(&self.config.executable, "--version")
    }

    fn run_ac_gain(&self, netlist: &str, params: &AcGainParams) -> Result<GainResult> {
        let out = &params.output_net;
        let directives = format!(
            ".ac lin 1 {f} {f}\n.print ac vm({out}) vp({out})\n.end\n",
            f = params.freq_hz,
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let rows: Vec<[f64; 4]> = parse_print_rows(Self::log_text(&run)?);
        let &[_, _, vm, vp_rad] = rows.last().ok_or_else(|| missing_columns(&run))?;
        Ok(GainResult {
            magnitude_db: db(vm)?,
            phase_deg: vp_rad.to_degrees(),
        })
    }

    fn run_ac_sweep(&self, netlist: &str, params: &AcSweepParams) -> Result<SweepResult> {
        let out = &params.output_net;
        let range = &params.range;
        let directives = format!(
            ".ac dec {ppd} {start} {stop}\n.print ac vm({out}) vp({out})\n.end\n",
            ppd = range.points_per_decade(),
            start = range.start_hz(),
            stop = range.stop_hz(),
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let mut rows: Vec<[f64; 4]> = parse_print_rows(Self::log_text(&run)?);
        if rows.is_empty() {
            return Err(missing_columns(&run));
        }
        order_by_frequency(&mut rows);

        let points = rows
            .iter()
            .map(|&[_, freq, vm, vp_rad]| {
                Ok(SweepPoint {
                    freq_hz: freq,
                    magnitude_db: db(vm)?,
                    phase_deg: vp_rad.to_degrees(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SweepResult::from_points(points)?)
    }

    fn run_noise_sweep(&self, netlist: &str, params: &NoiseParams) -> Result<NoiseResult> {
        let range = &params.range;
        let directives = format!(
            ".noise v({out}) {src} dec {ppd} {start} {stop}\n\
             .print noise onoise_spectrum\n.print noise onoise_total\n.end\n",
            out = params.output_net,
            src = params.input_source,
            ppd = range.points_per_decade(),
            start = range.start_hz(),
            stop = range.stop_hz(),
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let log = Self::log_text(&run)?;

        let mut rows: Vec<[f64; 3]> = parse_print_rows(log);
        if rows.is_empty() {
            return Err(missing_columns(&run));
        }
        order_by_frequency(&mut rows);
        let points: Vec<NoisePoint> = rows
            .iter()
            .map(|&[_, freq_hz, output_density]| NoisePoint {
                freq_hz,
                output_density,
            })
            .collect();

        // ngspice prints the integrated total as a scalar assignment;
        // fall back to trapezoidal integration of the spectrum if the
        // line is absent.
        let total_output_noise = scalar_assignment(log, "onoise_total")
            .unwrap_or_else(|| integrate_noise(&points));

        Ok(NoiseResult {
            points,
            total_output_noise,
        })
    }
}

/// Parse fixed-column `.print` data rows: lines whose whitespace-split
/// tokens are exactly `N` floats (index, frequency, values...).
/// Header, separator and banner lines never parse as all-float rows.
fn parse_print_rows<const N: usize>(log: &str) -> Vec<[f64; N]> {
    let mut rows = Vec::new();
    for line in log.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != N {
            continue;
        }
        let mut row = [0.0f64; N];
        let mut ok = true;
        for (slot, token) in row.iter_mut().zip(&tokens) {
            match token.parse::<f64>() {
                Ok(v) => *slot = v,
                Err(_) => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            rows.push(row);
        }
    }
    rows
}

/// Order data rows by the frequency column (column 1) and drop repeated
/// frequencies. Multi-page logs restart the index column and reprint
/// page boundaries, so raw row order is not trustworthy.
fn order_by_frequency<const N: usize>(rows: &mut Vec<[f64; N]>) {
    rows.sort_by(|a, b| a[1].total_cmp(&b[1]));
    rows.dedup_by(|a, b| a[1] == b[1]);
}

/// Find `name = <value>` in the log (ngspice scalar print format).
fn scalar_assignment(log: &str, name: &str) -> Option<f64> {
    for line in log.lines() {
        let lower = line.trim_start().to_lowercase();
        if let Some(rest) = lower.strip_prefix(name) {
            if let Some(value) = rest.trim_start().strip_prefix('=') {
                if let Ok(v) = value.trim().parse::<f64>() {
                    return Some(v);
                }
            }
        }
    }
    None
}

/// Trapezoidal integration of a density spectrum, in Vrms.
pub(crate) fn integrate_noise(points: &[NoisePoint]) -> f64 {
    let mut power = 0.0;
    for pair in points.windows(2) {
        let df = pair[1].freq_hz - pair[0].freq_hz;
        let d0 = pair[0].output_density;
        let d1 = pair[1].output_density;
        power += 0.5 * (d0 * d0 + d1 * d1) * df;
    }
    power.sqrt()
}

fn db(vm: f64) -> Result<f64> {
    if vm <= 0.0 {
        return Err(Error::SolverFailed {
            backend: BackendId::Ngspice.as_str().to_string(),
            diagnostics: format!("non-positive output magnitude {vm} in solver output"),
        });
    }
    Ok(20.0 * vm.log10())
}

fn missing_columns(run: &SolverRun) -> Error {
    Error::NetlistSyntax {
        backend: BackendId::Ngspice.as_str().to_string(),
        diagnostics: format!(
            "expected .print data columns not found in solver output\n{}",
            run.diagnostics()
        ),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::SpiceBackend;

    // Shape of an ngspice batch log for ".print ac vm(vout) vp(vout)".
    const AC_LOG: &str = "\
Note: No compatibility mode selected!

Circuit: * Non-inverting opamp stage

 AC Analysis   Fri Aug 28 12:00:00  2026
--------------------------------------------------------------------------------
Index   frequency       vm(vout)        vp(vout)
--------------------------------------------------------------------------------
0	1.000000e+02	9.987000e+00	-3.100000e-02
";

    #[test]
    fn test_parse_ac_rows() {
        let rows: Vec<[f64; 4]> = parse_print_rows(AC_LOG);
        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0][1], 100.0);
        assert_relative_eq!(rows[0][2], 9.987);
    }

    #[test]
    fn test_header_lines_are_not_rows() {
        let rows: Vec<[f64; 4]> = parse_print_rows("Index frequency vm vp\n");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_paginated_rows_ordered_before_integration() {
        // Second page restarts the index column and repeats the last
        // frequency of the first page.
        let log = "\
0	1.000000e+03	2.0e-09
1	1.000000e+04	1.0e-09
0	1.000000e+01	4.0e-09
1	1.000000e+02	3.0e-09
2	1.000000e+03	2.0e-09
";
        let mut rows: Vec<[f64; 3]> = parse_print_rows(log);
        order_by_frequency(&mut rows);

        assert_eq!(rows.len(), 4);
        for pair in rows.windows(2) {
            assert!(pair[1][1] > pair[0][1]);
        }
        // integration sees only positive frequency steps
        let points: Vec<NoisePoint> = rows
            .iter()
            .map(|&[_, freq_hz, output_density]| NoisePoint {
                freq_hz,
                output_density,
            })
            .collect();
        assert!(integrate_noise(&points) > 0.0);
    }

    #[test]
    fn test_scalar_assignment() {
        let log = "...\nonoise_total = 4.56e-05\n";
        assert_eq!(scalar_assignment(log, "onoise_total"), Some(4.56e-5));
        assert_eq!(scalar_assignment(log, "inoise_total"), None);
    }

    #[test]
    fn test_integrate_flat_spectrum() {
        // Flat 1 uV/sqrt(Hz) over 100 Hz -> 10 uVrms.
        let points = vec![
            NoisePoint { freq_hz: 0.0, output_density: 1e-6 },
            NoisePoint { freq_hz: 100.0, output_density: 1e-6 },
        ];
        assert_relative_eq!(integrate_noise(&points), 1e-5, max_relative = 1e-12);
    }

    #[test]
    fn test_unavailable_probe() {
        let backend = NgspiceBackend::new(
            BackendConfig::ngspice().with_executable("definitely-not-ngspice"),
        );
        assert!(!backend.is_available());
    }

    #[test]
    fn test_missing_executable_is_backend_unavailable() {
        let backend = NgspiceBackend::new(
            BackendConfig::ngspice().with_executable("definitely-not-ngspice"),
        );
        let params = AcGainParams {
            freq_hz: 1e3,
            output_net: "Vout".into(),
        };
        let err = backend.run_ac_gain("V1 Vout 0 AC 1\n", &params).unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable { .. }));
    }

    #[test]
    #[ignore] // Requires ngspice on PATH
    fn test_real_divider_gain() {
        let backend = NgspiceBackend::default();
        if !backend.is_available() {
            return;
        }
        let netlist = "* divider\nV1 Vin 0 AC 1\nR1 Vin Vout 1k\nR2 Vout 0 1k\n";
        let params = AcGainParams {
            freq_hz: 1e3,
            output_net: "Vout".into(),
        };
        let gain = backend.run_ac_gain(netlist, &params).unwrap();
        // Divider: -6.02 dB
        assert!((gain.magnitude_db + 6.02).abs() < 0.1);
    }
}
