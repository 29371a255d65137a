//! Shared analysis pipeline and text report for `analyse` and `demo`.

use std::fmt;
use std::sync::Arc;

use localcorr_bootstrap::BootstrapResult;
use localcorr_core::math::{integrate, MarginalCurves};
use localcorr_engine::{LocalCorrelationEngine, LocalCorrelationResult};
use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Everything printed for one analysed sample.
pub struct Report {
    pub samples: usize,
    pub dropped: usize,
    pub threshold: f64,
    pub analysis: Arc<LocalCorrelationResult>,
    pub bootstrap: Option<Arc<BootstrapResult>>,
    pub t_marginals: Option<MarginalCurves>,
}

/// Run the surface and, if enabled, the bootstrap on `(xs, ys)`.
pub fn run_analysis(xs: &[f64], ys: &[f64], dropped: usize, config: &CliConfig) -> Result<Report> {
    let engine = LocalCorrelationEngine::new(config.engine_config()?)?;
    let analysis = engine.analyse(xs, ys)?;
    info!(
        hx = analysis.bandwidth.hx(),
        hy = analysis.bandwidth.hy(),
        defined = analysis.correlation.count_defined(),
        "Surface estimated"
    );

    let (bootstrap, t_marginals) = if config.bootstrap_enabled() {
        let report = |p: f64| info!("Bootstrap progress: {:.0}%", p * 100.0);
        let result = if config.parallel {
            engine.bootstrap_parallel(xs, ys, report, None)?
        } else {
            engine.bootstrap(xs, ys, report, None)?
        };
        let curves = integrate(&result.t, &analysis.density)?;
        (Some(result), Some(curves))
    } else {
        (None, None)
    };

    Ok(Report {
        samples: xs.len(),
        dropped,
        threshold: config.significance_threshold,
        analysis,
        bootstrap,
        t_marginals,
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:>9.4}", v),
        None => format!("{:>9}", "-"),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.analysis;
        let size = a.grid.size();

        writeln!(f, "========================================")?;
        writeln!(f, "Local Gaussian Correlation")?;
        writeln!(f, "========================================")?;
        writeln!(f, "Samples:    {} ({} dropped)", self.samples, self.dropped)?;
        writeln!(
            f,
            "Bandwidth:  hx = {:.4}, hy = {:.4}",
            a.bandwidth.hx(),
            a.bandwidth.hy()
        )?;
        match a.pearson {
            Some(r) => writeln!(f, "Pearson r:  {:.4}", r)?,
            None => writeln!(f, "Pearson r:  undefined")?,
        }
        writeln!(
            f,
            "Grid:       {} x {}, {} defined cells",
            size,
            size,
            a.correlation.count_defined()
        )?;

        if let Some(boot) = &self.bootstrap {
            writeln!(
                f,
                "Bootstrap:  {} iterations, seed {}",
                boot.iterations, boot.seed
            )?;
            writeln!(
                f,
                "Significant cells (|t| >= {:.2}): {} of {}",
                self.threshold,
                boot.significant_cells(self.threshold).len(),
                boot.t.count_defined()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Marginals")?;
        writeln!(f, "----------------------------------------")?;
        write!(
            f,
            "{:>4} {:>9} {:>9} {:>9} {:>9}",
            "k", "x", "rho(x)", "y", "rho(y)"
        )?;
        if self.t_marginals.is_some() {
            write!(f, " {:>9} {:>9}", "t(x)", "t(y)")?;
        }
        writeln!(f)?;

        for k in 0..size {
            write!(
                f,
                "{:>4} {:>9.4} {} {:>9.4} {}",
                k,
                a.grid.x()[k],
                fmt_opt(a.marginals.x[k]),
                a.grid.y()[k],
                fmt_opt(a.marginals.y[k])
            )?;
            if let Some(t) = &self.t_marginals {
                write!(f, " {} {}", fmt_opt(t.x[k]), fmt_opt(t.y[k]))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "----------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> (Vec<f64>, Vec<f64>) {
        let xs: Vec<f64> = (1..=n).map(|k| k as f64).collect();
        (xs.clone(), xs)
    }

    #[test]
    fn test_report_without_bootstrap() {
        let config = CliConfig {
            grid_size: 5,
            bootstrap_iterations: 0,
            ..Default::default()
        };
        let (xs, ys) = line(10);
        let report = run_analysis(&xs, &ys, 2, &config).unwrap();
        assert!(report.bootstrap.is_none());

        let text = report.to_string();
        assert!(text.contains("Samples:    10 (2 dropped)"));
        assert!(text.contains("Pearson r:  1.0000"));
        assert!(text.contains("5 x 5"));
        assert!(!text.contains("t(x)"));
    }

    #[test]
    fn test_report_with_bootstrap() {
        let config = CliConfig {
            grid_size: 5,
            bootstrap_iterations: 40,
            seed: Some(3),
            ..Default::default()
        };
        let (xs, ys) = line(12);
        let report = run_analysis(&xs, &ys, 0, &config).unwrap();
        let boot = report.bootstrap.as_ref().unwrap();
        assert_eq!(boot.iterations, 40);
        assert_eq!(boot.seed, 3);

        let text = report.to_string();
        assert!(text.contains("Bootstrap:  40 iterations, seed 3"));
        assert!(text.contains("t(x)"));
    }

    #[test]
    fn test_too_few_samples() {
        let (xs, ys) = line(5);
        assert!(run_analysis(&xs, &ys, 0, &CliConfig::default()).is_err());
    }
}
