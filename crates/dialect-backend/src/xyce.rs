//! Xyce adapter (secondary backend).
//!
//! Xyce digests most PSpice-flavored model text directly, so models
//! classified `PspiceLike`/`LtspiceOnly` route here. Invoked with
//! `-delim COMMA -o <file>`; results are parsed from the comma-delimited
//! `.prn` table (`Index,FREQ,...` header then data rows).

use std::path::PathBuf;

use dialect_core::{
    AcGainParams, AcSweepParams, BackendId, GainResult, NoiseParams, NoisePoint, NoiseResult,
    SweepPoint, SweepResult,
};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::ngspice::integrate_noise;
use crate::runner::{invoke, probe, with_directives, SolverRun};

pub struct XyceBackend {
    config: BackendConfig,
}

impl XyceBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn run(&self, deck: String) -> Result<SolverRun> {
        invoke(
            BackendId::Xyce.as_str(),
            &self.config,
            &deck,
            "xyce.prn",
            |netlist, output| {
                vec![
                    PathBuf::from("-delim"),
                    PathBuf::from("COMMA"),
                    PathBuf::from("-o"),
                    output.to_path_buf(),
                    netlist.to_path_buf(),
                ]
            },
        )
    }

    fn table(&self, run: &SolverRun, expected_cols: usize) -> Result<Vec<Vec<f64>>> {
        let text = run.output_file.as_deref().ok_or_else(|| Error::SolverFailed {
            backend: BackendId::Xyce.as_str().to_string(),
            diagnostics: "Xyce produced no output table".to_string(),
        })?;
        let rows = parse_comma_table(text, expected_cols);
        if rows.is_empty() {
            return Err(Error::NetlistSyntax {
                backend: BackendId::Xyce.as_str().to_string(),
                diagnostics: format!(
                    "expected {expected_cols}-column data rows not found in Xyce output\n{}",
                    run.diagnostics()
                ),
            });
        }
        Ok(rows)
    }
}

impl Default for XyceBackend {
    fn default() -> Self {
        Self::new(BackendConfig::xyce())
    }
}

impl crate::SpiceBackend for XyceBackend {
    fn id(&self) -> BackendId {
        BackendId::Xyce
    }

    fn is_available(&self) -> bool {
        probe(&self.config.executable, "-v")
    }

    fn run_ac_gain(&self, netlist: &str, params: &AcGainParams) -> Result<GainResult> {
        let out = &params.output_net;
        let directives = format!(
            ".ac lin 1 {f} {f}\n.print ac VM({out}) VP({out})\n.end\n",
            f = params.freq_hz,
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let rows = self.table(&run, 4)?;
        let row = &rows[rows.len() - 1];
        Ok(GainResult {
            magnitude_db: db(row[2], &run)?,
            // Xyce VP() already reports degrees.
            phase_deg: row[3],
        })
    }

    fn run_ac_sweep(&self, netlist: &str, params: &AcSweepParams) -> Result<SweepResult> {
        let out = &params.output_net;
        let range = &params.range;
        let directives = format!(
            ".ac dec {ppd} {start} {stop}\n.print ac VM({out}) VP({out})\n.end\n",
            ppd = range.points_per_decade(),
            start = range.start_hz(),
            stop = range.stop_hz(),
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let mut rows = self.table(&run, 4)?;
        rows.sort_by(|a, b| a[1].total_cmp(&b[1]));
        rows.dedup_by(|a, b| a[1] == b[1]);

        let points = rows
            .iter()
            .map(|row| {
                Ok(SweepPoint {
                    freq_hz: row[1],
                    magnitude_db: db(row[2], &run)?,
                    phase_deg: row[3],
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SweepResult::from_points(points)?)
    }

    fn run_noise_sweep(&self, netlist: &str, params: &NoiseParams) -> Result<NoiseResult> {
        let range = &params.range;
        let directives = format!(
            ".noise V({out}) {src} dec {ppd} {start} {stop}\n\
             .print noise ONOISE\n.end\n",
            out = params.output_net,
            src = params.input_source,
            ppd = range.points_per_decade(),
            start = range.start_hz(),
            stop = range.stop_hz(),
        );
        let deck = with_directives(netlist, &directives);
        let run = self.run(deck)?;
        let mut rows = self.table(&run, 3)?;
        rows.sort_by(|a, b| a[1].total_cmp(&b[1]));
        rows.dedup_by(|a, b| a[1] == b[1]);

        let points: Vec<NoisePoint> = rows
            .iter()
            .map(|row| NoisePoint {
                freq_hz: row[1],
                output_density: row[2],
            })
            .collect();
        // Xyce prints no integrated total; the adapter integrates the
        // spectrum itself.
        let total_output_noise = integrate_noise(&points);

        Ok(NoiseResult {
            points,
            total_output_noise,
        })
    }
}

/// Parse comma-delimited data rows with exactly `cols` numeric fields.
/// The header (`Index,FREQ,...`) and the `End of Xyce(TM) Simulation`
/// trailer never parse as all-numeric rows.
fn parse_comma_table(text: &str, cols: usize) -> Vec<Vec<f64>> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != cols {
            continue;
        }
        let parsed: Option<Vec<f64>> = fields.iter().map(|f| f.parse::<f64>().ok()).collect();
        if let Some(row) = parsed {
            rows.push(row);
        }
    }
    rows
}

fn db(vm: f64, run: &SolverRun) -> Result<f64> {
    if vm <= 0.0 {
        return Err(Error::SolverFailed {
            backend: BackendId::Xyce.as_str().to_string(),
            diagnostics: format!(
                "non-positive output magnitude {vm} in solver output\n{}",
                run.diagnostics()
            ),
        });
    }
    Ok(20.0 * vm.log10())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::SpiceBackend;

    const PRN: &str = "\
Index,FREQ,VM(VOUT),VP(VOUT)
0,1.0000e+02,9.9870e+00,-3.1000e-02
1,1.0000e+03,9.8700e+00,-3.1000e-01
End of Xyce(TM) Simulation
";

    #[test]
    fn test_parse_prn_rows() {
        let rows = parse_comma_table(PRN, 4);
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[1][1], 1e3);
        assert_relative_eq!(rows[1][2], 9.87);
    }

    #[test]
    fn test_header_and_trailer_skipped() {
        let rows = parse_comma_table("Index,FREQ,VM(V)\nEnd of Xyce(TM) Simulation\n", 3);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_unavailable_probe() {
        let backend =
            XyceBackend::new(BackendConfig::xyce().with_executable("definitely-not-xyce"));
        assert!(!backend.is_available());
    }

    #[test]
    fn test_missing_executable_is_backend_unavailable() {
        let backend =
            XyceBackend::new(BackendConfig::xyce().with_executable("definitely-not-xyce"));
        let params = AcGainParams {
            freq_hz: 1e3,
            output_net: "Vout".into(),
        };
        let err = backend.run_ac_gain("V1 Vout 0 AC 1\n", &params).unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable { .. }));
    }

    #[test]
    #[ignore] // Requires Xyce on PATH
    fn test_real_divider_gain() {
        let backend = XyceBackend::default();
        if !backend.is_available() {
            return;
        }
        let netlist = "* divider\nV1 Vin 0 AC 1\nR1 Vin Vout 1k\nR2 Vout 0 1k\n";
        let params = AcGainParams {
            freq_hz: 1e3,
            output_net: "Vout".into(),
        };
        let gain = backend.run_ac_gain(netlist, &params).unwrap();
        assert!((gain.magnitude_db + 6.02).abs() < 0.1);
    }
}
