//! Human-readable output for runs and the final analysis.

use console::style;
use perfscope_core::analysis::{AnalysisResult, MetricStats};
use perfscope_core::metrics::{LcpElement, MeasurementStatus, RunRecord};
use std::fmt;

const SLOWEST_SHOWN: usize = 3;
const RESOURCE_NAME_WIDTH: usize = 70;

/// How each metric of a run was obtained
pub fn render_run(record: &RunRecord) -> String {
    RunDetails(record).to_string()
}

/// One-line result of a successful run
pub fn render_run_summary(record: &RunRecord) -> String {
    format!(
        "   {} Run {}: FCP={}, LCP={}, TTFB={}, Resources={}",
        style("✅").green(),
        record.run_number,
        ms(record.fcp()),
        ms(record.lcp()),
        ms(record.ttfb()),
        record.resource_count()
    )
}

/// Aggregate statistics and ratings across all runs
pub fn render_analysis(analysis: &AnalysisResult, requested_runs: u32) -> String {
    AnalysisDetails {
        analysis,
        requested_runs,
    }
    .to_string()
}

struct RunDetails<'a>(&'a RunRecord);

impl fmt::Display for RunDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let title = format!("📋 DETAILED METRICS EXPLANATION - Run {}:", record.run_number);
        writeln!(f, "\n{}", style(title).bold())?;
        writeln!(f, "{}", "-".repeat(60))?;

        write_fcp(f, record)?;
        write_lcp(f, record)?;
        write_navigation(f, record)?;
        write_resources(f, record)
    }
}

fn write_fcp(f: &mut fmt::Formatter<'_>, record: &RunRecord) -> fmt::Result {
    let vitals = &record.metrics.web_vitals;
    writeln!(f, "{}", style("🎨 First Contentful Paint (FCP):").bold())?;

    let Some(fcp) = vitals.fcp else {
        return writeln!(f, "   ❌ Not measured - no FCP entries found");
    };

    let details = &vitals.fcp_details;
    writeln!(f, "   ✅ Value: {:.1}ms", fcp)?;
    if let Some(source) = &details.source {
        writeln!(f, "   📊 Source: {}", source)?;
    }
    if let Some(method) = &details.method {
        writeln!(f, "   🔍 Method: {}", method)?;
    }
    if !details.all_paint_entries.is_empty() {
        writeln!(f, "   📝 Paint entries found: {}", details.all_paint_entries.len())?;
        for entry in &details.all_paint_entries {
            writeln!(f, "      - {}: {:.1}ms", entry.name, entry.start_time)?;
        }
    }
    Ok(())
}

fn write_lcp(f: &mut fmt::Formatter<'_>, record: &RunRecord) -> fmt::Result {
    let vitals = &record.metrics.web_vitals;
    let lcp = &vitals.lcp_details;
    writeln!(f, "\n{}", style("🖼️  Largest Contentful Paint (LCP):").bold())?;

    let Some(value) = vitals.lcp else {
        writeln!(f, "   ❌ Not measured")?;
        let reason = lcp.reason.as_deref().unwrap_or("No LCP entries captured");
        return writeln!(f, "   🔍 Reason: {}", reason);
    };

    writeln!(f, "   ✅ Value: {:.1}ms", value)?;
    writeln!(f, "   📊 Source: {}", lcp.method)?;
    writeln!(f, "   🔍 Method: Monitored LCP changes over 3 seconds")?;

    if !lcp.measurements.is_empty() {
        writeln!(f, "   📈 LCP Timeline ({} measurements):", lcp.measurements.len())?;
        for m in &lcp.measurements {
            let status = match m.status {
                MeasurementStatus::Final => style("🏁 FINAL").green().to_string(),
                MeasurementStatus::Superseded => style("⏭️  superseded").dim().to_string(),
            };
            writeln!(
                f,
                "      {}. {:.1}ms (size: {}px²) - {}",
                m.sequence, m.timing, m.size, status
            )?;
        }
    }

    if let Some(element) = &lcp.final_element {
        write_element(f, element)?;
    }

    if !lcp.entries.is_empty() {
        writeln!(f, "   🔄 Total LCP candidates evaluated: {}", lcp.entries.len())?;
    }
    Ok(())
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &LcpElement) -> fmt::Result {
    writeln!(f, "   🎯 LCP Element:")?;
    let tag = if element.tag_name.is_empty() {
        "unknown".to_string()
    } else {
        element.tag_name.to_lowercase()
    };
    writeln!(f, "      Tag: <{}>", tag)?;
    if !element.id.is_empty() {
        writeln!(f, "      ID: #{}", element.id)?;
    }
    if !element.class_name.is_empty() {
        writeln!(f, "      Class: .{}", element.class_name)?;
    }
    if !element.src.is_empty() {
        writeln!(f, "      Source: {}", element.src)?;
    }
    if !element.text_content.is_empty() {
        writeln!(f, "      Text: '{}'", element.text_content)?;
    }
    Ok(())
}

fn write_navigation(f: &mut fmt::Formatter<'_>, record: &RunRecord) -> fmt::Result {
    let nav = record.metrics.navigation.as_ref();
    writeln!(f, "\n{}", style("⏱️  Navigation Timing:").bold())?;
    writeln!(f, "   🌐 DNS Lookup: {}", ms(nav.map(|n| n.dns_lookup)))?;
    writeln!(f, "   🤝 TCP Connect: {}", ms(nav.map(|n| n.tcp_connect)))?;
    writeln!(f, "   🔒 SSL Handshake: {}", ms(nav.and_then(|n| n.ssl_handshake)))?;
    writeln!(
        f,
        "   📡 TTFB: {} (responseStart - requestStart)",
        ms(nav.map(|n| n.ttfb))
    )?;
    writeln!(f, "   📄 DOM Content Loaded: {}", ms(nav.map(|n| n.dom_content_loaded)))
}

fn write_resources(f: &mut fmt::Formatter<'_>, record: &RunRecord) -> fmt::Result {
    let resources = &record.metrics.resources;
    writeln!(f, "\n{}", style("📦 Resources Analysis:").bold())?;
    writeln!(f, "   📊 Total loaded: {}", resources.total_count)?;
    writeln!(f, "   💾 Total size: {:.1} KB", kb(resources.total_size))?;

    if resources.slowest.is_empty() {
        return Ok(());
    }
    writeln!(f, "   🐌 Top {} slowest resources:", SLOWEST_SHOWN)?;
    for (i, res) in resources.slowest.iter().take(SLOWEST_SHOWN).enumerate() {
        let size_info = if res.size > 0 {
            format!(" ({:.1}KB)", kb(res.size))
        } else {
            String::new()
        };
        writeln!(
            f,
            "      {}. {}: {:.1}ms{}",
            i + 1,
            res.initiator_type,
            res.duration,
            size_info
        )?;
        writeln!(f, "         {}...", truncate_chars(&res.name, RESOURCE_NAME_WIDTH))?;
    }
    Ok(())
}

struct AnalysisDetails<'a> {
    analysis: &'a AnalysisResult,
    requested_runs: u32,
}

impl fmt::Display for AnalysisDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        let title = format!("📊 FINAL PERFORMANCE ANALYSIS ({} cache):", analysis.cache_mode);
        writeln!(f, "\n{}", style(title).bold().cyan())?;
        writeln!(f, "{}", style("=".repeat(80)).cyan())?;
        writeln!(
            f,
            "✅ Successful tests: {}/{}",
            analysis.successful_tests, self.requested_runs
        )?;

        for (name, unit, stats) in analysis.metrics.iter() {
            if let MetricStats::Measured { avg, min, max, .. } = stats {
                writeln!(
                    f,
                    "{}: avg={:.1}{}, range={:.1}-{:.1}{}",
                    name.to_uppercase(),
                    avg,
                    unit,
                    min,
                    max,
                    unit
                )?;
            }
        }

        let assessment = &analysis.assessment;
        writeln!(
            f,
            "\n🎯 Overall Rating: {}",
            style(assessment.overall_rating.as_str().to_uppercase()).bold()
        )?;
        writeln!(f, "   FCP: {}", assessment.fcp_rating)?;
        writeln!(f, "   LCP: {}", assessment.lcp_rating)
    }
}

fn ms(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}ms", v),
        None => "N/A".to_string(),
    }
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
