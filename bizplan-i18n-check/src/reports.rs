use anyhow::Result;
use bizplan_i18n::{CheckConfig, ComparisonResult, FillReport, LocaleReport, RunSummary};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// Settings shared by every renderer.
pub struct ReportContext<'a> {
    pub config: &'a CheckConfig,
    pub dry_run: bool,
    pub verbose: bool,
    pub generated_at: String,
}

/// Everything one run produced. `None` means the phase did not run.
pub struct RunOutcome {
    pub checks: Option<Vec<LocaleReport>>,
    pub fills: Option<Vec<FillReport>>,
}

impl RunOutcome {
    pub fn summary(&self) -> Option<RunSummary> {
        self.checks.as_deref().map(RunSummary::from_reports)
    }

    /// Whether the run should exit successfully.
    pub fn passed(&self, strict: bool) -> bool {
        let checks_passed = self.summary().is_none_or(|s| s.passed(strict));
        let fills_passed = self.fills.as_deref().is_none_or(|fills| {
            fills
                .iter()
                .all(|f| matches!(f, FillReport::Filled { .. }))
        });
        checks_passed && fills_passed
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: &'a str,
    base_locale: &'a str,
    strict: bool,
    dry_run: bool,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locales: Option<&'a [LocaleReport]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fills: Option<&'a [FillReport]>,
}

pub fn write_console_report(
    out: &mut dyn Write,
    outcome: &RunOutcome,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    if let Some(fills) = &outcome.fills {
        write_console_fills(out, fills, ctx)?;
    }
    if let Some(checks) = &outcome.checks {
        write_console_checks(out, checks, ctx)?;
    }
    if let Some(summary) = outcome.summary() {
        write_console_summary(out, &summary, outcome.passed(ctx.config.strict))?;
    }
    Ok(())
}

fn write_console_fills(
    out: &mut dyn Write,
    fills: &[FillReport],
    ctx: &ReportContext<'_>,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("🧩 Gap filling from '{}'", ctx.config.base_locale)
            .bright_yellow()
            .bold()
    )?;
    writeln!(out, "{}", "-".repeat(30).yellow())?;

    if fills.is_empty() {
        writeln!(out, "No target locales found.")?;
    }

    for fill in fills {
        match fill {
            FillReport::Filled {
                locale,
                backfilled_keys,
                written,
            } => {
                let state = if backfilled_keys.is_empty() {
                    "up to date".green()
                } else if *written {
                    "written".green()
                } else if ctx.dry_run {
                    "dry run, not written".yellow()
                } else {
                    "not written".yellow()
                };
                writeln!(
                    out,
                    "✏️  {}: {} keys backfilled ({state})",
                    locale.bold(),
                    backfilled_keys.len()
                )?;
                if ctx.verbose || ctx.dry_run {
                    for key in backfilled_keys {
                        writeln!(out, "     • {key}")?;
                    }
                }
            }
            FillReport::Failed { locale, reason } => {
                writeln!(
                    out,
                    "⛔ {}: could not be filled: {}",
                    locale.bold(),
                    reason.red()
                )?;
            }
        }
    }
    Ok(())
}

fn write_console_checks(
    out: &mut dyn Write,
    checks: &[LocaleReport],
    ctx: &ReportContext<'_>,
) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("📋 Locale check against '{}'", ctx.config.base_locale)
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", "==============================".cyan())?;

    if checks.is_empty() {
        writeln!(out, "No target locales found.")?;
    }

    for report in checks {
        match report {
            LocaleReport::Compared(result) => write_console_result(out, result, ctx)?,
            LocaleReport::Failed { locale, reason } => {
                writeln!(
                    out,
                    "⛔ {} could not be loaded: {}",
                    locale.bold(),
                    reason.red()
                )?;
            }
        }
    }
    Ok(())
}

fn write_console_result(
    out: &mut dyn Write,
    result: &ComparisonResult,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    let warnings = result.empty_values.len() + result.placeholder_mismatches.len();
    if result.is_clean(ctx.config.strict) {
        if warnings == 0 {
            writeln!(out, "{} {}: clean", "✅".green(), result.locale.bold())?;
        } else {
            writeln!(
                out,
                "{} {}: clean ({warnings} warnings)",
                "✅".green(),
                result.locale.bold()
            )?;
        }
    } else {
        writeln!(
            out,
            "{} {}: {} issues",
            "❌".red(),
            result.locale.bold(),
            result.issue_count()
        )?;
    }

    if !result.missing_keys.is_empty() {
        writeln!(out, "   Missing keys ({}):", result.missing_keys.len())?;
        for key in &result.missing_keys {
            writeln!(out, "     • {}", key.red())?;
        }
    }
    if !result.type_mismatches.is_empty() {
        writeln!(out, "   Type mismatches ({}):", result.type_mismatches.len())?;
        for mismatch in &result.type_mismatches {
            writeln!(
                out,
                "     • {}: expected {}, found {}",
                mismatch.key.red(),
                mismatch.expected,
                mismatch.actual
            )?;
        }
    }
    if !result.extra_keys.is_empty() {
        writeln!(out, "   Extra keys ({}):", result.extra_keys.len())?;
        for key in &result.extra_keys {
            writeln!(out, "     • {}", key.yellow())?;
        }
    }

    if !result.empty_values.is_empty() {
        writeln!(out, "   ⚠️  Empty values ({}):", result.empty_values.len())?;
        if ctx.verbose {
            for key in &result.empty_values {
                writeln!(out, "     • {key}")?;
            }
        }
    }
    if !result.placeholder_mismatches.is_empty() {
        writeln!(
            out,
            "   ⚠️  Placeholder mismatches ({}):",
            result.placeholder_mismatches.len()
        )?;
        if ctx.verbose {
            for mismatch in &result.placeholder_mismatches {
                writeln!(
                    out,
                    "     • {}: expected {{{}}}, found {{{}}}",
                    mismatch.key,
                    mismatch.expected.join(", "),
                    mismatch.actual.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

fn write_console_summary(out: &mut dyn Write, summary: &RunSummary, passed: bool) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========".cyan())?;
    writeln!(out, "Locales compared: {}", summary.locales_compared)?;
    writeln!(out, "Locales failed: {}", summary.locales_failed)?;
    writeln!(out, "Errors: {}", summary.error_count().to_string().red())?;
    writeln!(out, "Warnings: {}", summary.warning_count().to_string().yellow())?;
    let verdict = if passed {
        "✅ PASS".green()
    } else {
        "❌ FAIL".red()
    };
    writeln!(out, "Result: {verdict}")?;
    Ok(())
}

pub fn write_json_report(
    out: &mut dyn Write,
    outcome: &RunOutcome,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    let report = JsonReport {
        generated_at: &ctx.generated_at,
        base_locale: &ctx.config.base_locale,
        strict: ctx.config.strict,
        dry_run: ctx.dry_run,
        passed: outcome.passed(ctx.config.strict),
        summary: outcome.summary(),
        locales: outcome.checks.as_deref(),
        fills: outcome.fills.as_deref(),
    };
    let json_output = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn write_markdown_report(
    out: &mut dyn Write,
    outcome: &RunOutcome,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    writeln!(out, "# Locale Consistency Report\n")?;
    writeln!(out, "- **Base locale**: {}", ctx.config.base_locale)?;
    if let Some(summary) = outcome.summary() {
        writeln!(out, "- **Locales compared**: {}", summary.locales_compared)?;
        writeln!(out, "- **Locales failed**: {}", summary.locales_failed)?;
        writeln!(out, "- **Errors**: {}", summary.error_count())?;
        writeln!(out, "- **Warnings**: {}", summary.warning_count())?;
    }
    let verdict = if outcome.passed(ctx.config.strict) {
        "✅ pass"
    } else {
        "❌ fail"
    };
    writeln!(out, "- **Result**: {verdict}\n")?;

    if let Some(checks) = &outcome.checks {
        writeln!(out, "## Locales\n")?;
        if checks.is_empty() {
            writeln!(out, "_No target locales found._\n")?;
        }
        for report in checks {
            match report {
                LocaleReport::Compared(result) => write_markdown_result(out, result, ctx)?,
                LocaleReport::Failed { locale, reason } => {
                    writeln!(out, "### ⛔ {locale}\n")?;
                    writeln!(out, "Could not be loaded: {reason}\n")?;
                }
            }
        }
    }

    if let Some(fills) = &outcome.fills {
        writeln!(out, "## Gap Filling\n")?;
        writeln!(out, "| Locale | Backfilled keys | Written |")?;
        writeln!(out, "|---|---|---|")?;
        for fill in fills {
            match fill {
                FillReport::Filled {
                    locale,
                    backfilled_keys,
                    written,
                } => {
                    let written = if *written { "yes" } else { "no" };
                    writeln!(out, "| {locale} | {} | {written} |", backfilled_keys.len())?;
                }
                FillReport::Failed { locale, reason } => {
                    writeln!(out, "| {locale} | failed: {reason} | no |")?;
                }
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "_Generated {}_", ctx.generated_at)?;
    Ok(())
}

fn write_markdown_result(
    out: &mut dyn Write,
    result: &ComparisonResult,
    ctx: &ReportContext<'_>,
) -> Result<()> {
    let status = if result.is_clean(ctx.config.strict) {
        "✅"
    } else {
        "❌"
    };
    writeln!(out, "### {status} {}\n", result.locale)?;

    if result.issue_count() == 0 {
        writeln!(out, "No issues.\n")?;
        return Ok(());
    }

    let key_sections = [
        ("Missing keys", &result.missing_keys),
        ("Extra keys", &result.extra_keys),
        ("Empty values", &result.empty_values),
    ];
    for (title, keys) in key_sections {
        if keys.is_empty() {
            continue;
        }
        writeln!(out, "**{title}** ({})\n", keys.len())?;
        for key in keys {
            writeln!(out, "- `{key}`")?;
        }
        writeln!(out)?;
    }

    if !result.type_mismatches.is_empty() {
        writeln!(out, "**Type mismatches** ({})\n", result.type_mismatches.len())?;
        writeln!(out, "| Key | Expected | Actual |")?;
        writeln!(out, "|---|---|---|")?;
        for mismatch in &result.type_mismatches {
            writeln!(
                out,
                "| `{}` | {} | {} |",
                mismatch.key, mismatch.expected, mismatch.actual
            )?;
        }
        writeln!(out)?;
    }

    if !result.placeholder_mismatches.is_empty() {
        writeln!(
            out,
            "**Placeholder mismatches** ({})\n",
            result.placeholder_mismatches.len()
        )?;
        for mismatch in &result.placeholder_mismatches {
            writeln!(
                out,
                "- `{}`: expected `{}`, found `{}`",
                mismatch.key,
                mismatch.expected.join(", "),
                mismatch.actual.join(", ")
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}
