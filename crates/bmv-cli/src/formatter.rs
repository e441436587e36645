//! Terminal rendering of dashboard views

use bmv_stock::metrics::TRADING_DAYS_PER_YEAR;
use bmv_stock::{
    ChartRange, ChartSeries, DashboardError, DashboardView, PerformanceReport, ReturnWindow,
    Roster,
};
use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Columns used by the price sparkline
pub const CHART_WIDTH: usize = 60;

/// Ratio as a percentage with two decimals, e.g. `0.1234` -> `12.34%`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Signed variant of [`format_percent`] for price changes
pub fn format_change(ratio: f64) -> String {
    format!("{:+.2}%", ratio * 100.0)
}

pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// User-facing message for a pipeline error
pub fn format_error(err: &DashboardError) -> String {
    let message = match err {
        DashboardError::InvalidTicker(_) => {
            "Ticker inválido o no se pudo establecer conexión con Yahoo Finance.".to_string()
        }
        DashboardError::FetchFailure { .. } => {
            "No se pudieron obtener datos para este ticker.".to_string()
        }
        other => format!("Error: {other}"),
    };
    format!("❌ {message}")
}

/// Block sparkline of `values` squeezed into at most `width` columns.
///
/// Each column averages its bucket; a flat series renders at mid height.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let columns: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        (0..width)
            .map(|i| {
                let start = i * values.len() / width;
                let end = ((i + 1) * values.len() / width).max(start + 1);
                let bucket = &values[start..end];
                bucket.iter().sum::<f64>() / bucket.len() as f64
            })
            .collect()
    };

    let (min, max) = columns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;
    let top = SPARK_LEVELS.len() - 1;

    columns
        .iter()
        .map(|&v| {
            let level = if span > 0.0 {
                (((v - min) / span) * top as f64).round() as usize
            } else {
                top / 2
            };
            SPARK_LEVELS[level.min(top)]
        })
        .collect()
}

/// Sparkline of the full history plus the change over each chart range
pub fn render_chart(chart: &ChartSeries, company_name: &str) -> String {
    let Some(meta) = chart.metadata() else {
        return "No se pudieron cargar datos históricos para este ticker.\n".to_string();
    };

    let closes: Vec<f64> = chart.points().iter().map(|p| p.close).collect();
    let mut out = format!("📊 Precio histórico de {company_name}\n");
    out.push_str(&format!("{}\n", sparkline(&closes, CHART_WIDTH)));
    out.push_str(&format!(
        "{} → {}  ({} días)  mín {:.2} MXN  máx {:.2} MXN\n",
        meta.start_date.format("%d/%m/%Y"),
        meta.end_date.format("%d/%m/%Y"),
        meta.data_points,
        meta.min_close,
        meta.max_close,
    ));

    let changes: Vec<String> = ChartRange::ALL
        .iter()
        .filter_map(|&range| {
            chart
                .range_change(range)
                .map(|change| format!("{range}: {}", format_change(change)))
        })
        .collect();
    if !changes.is_empty() {
        out.push_str(&format!("Variación  {}\n", changes.join("  ")));
    }
    out
}

/// Período / Rendimiento Anualizado table
pub fn returns_table(report: &PerformanceReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Período", "Rendimiento Anualizado"]);

    for window in ReturnWindow::ALL {
        table.add_row(vec![
            window.label().to_string(),
            format_percent(report.cagr(window)),
        ]);
    }
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn render_performance(report: &PerformanceReport, company_name: &str) -> String {
    let mut out = format!("📈 Rendimientos Anualizados de {company_name}\n");
    out.push_str(
        "Este cálculo considera el precio al inicio y al final del periodo para determinar \
         el rendimiento anualizado.\n",
    );
    out.push_str(&format!("{}\n\n", returns_table(report)));

    out.push_str("🔎 Análisis de Riesgo\n");
    out.push_str(&format!(
        "Volatilidad anualizada: {}\n",
        format_percent(report.annualized_volatility)
    ));
    out.push_str(&format!(
        "La volatilidad anualizada es una medida del riesgo basada en la desviación estándar \
         de los rendimientos diarios, multiplicada por la raíz cuadrada de {TRADING_DAYS_PER_YEAR} \
         (número aproximado de días de trading en un año). Este valor representa la dispersión \
         de los rendimientos respecto a su media.\n"
    ));
    out
}

/// Full dashboard for one ticker
pub fn render_dashboard(view: &DashboardView) -> String {
    let company = &view.company;
    let mut out = format!("\n🏢 {} ({})\n", company.display_name, view.ticker);
    out.push_str(&format!("Sector: {}\n", company.sector.translated));
    out.push_str(&format!("Industria: {}\n\n", company.industry.translated));
    out.push_str("Descripción de la Empresa\n");
    out.push_str(&format!("{}\n\n", company.summary.translated));

    for warning in &view.warnings {
        out.push_str(&format!("⚠️  {warning}\n"));
    }
    if !view.warnings.is_empty() {
        out.push('\n');
    }

    out.push_str(&render_chart(&view.chart, &company.display_name));
    out.push('\n');

    if let Some(report) = &view.performance {
        out.push_str(&render_performance(report, &company.display_name));
    }
    for note in &view.notes {
        out.push_str(&format!("ℹ️  {note}\n"));
    }

    out.push_str(&format!(
        "\nÚltima actualización: {}\n",
        format_timestamp(&view.generated_at)
    ));
    out
}

/// Numbered roster, as offered by the interactive menu
pub fn render_roster(roster: &Roster) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Ticker", "Empresa"]);
    for (i, entry) in roster.tickers().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.symbol.clone(),
            entry.name.clone(),
        ]);
    }
    format!(
        "Selección de Empresa\n{table}\n\
         Estos tickers corresponden a empresas que cotizan en la Bolsa Mexicana de Valores.\n"
    )
}

pub fn about() -> &'static str {
    "Acerca de esta aplicación\n\
     Esta aplicación permite analizar datos bursátiles de empresas que cotizan en la \
     Bolsa Mexicana de Valores. Los datos se obtienen a través de Yahoo Finance.\n\
     \n\
     Funcionalidades:\n\
     - Visualización de información fundamental de la empresa\n\
     - Gráfico de precios históricos\n\
     - Cálculo de rendimientos anualizados (CAGR)\n\
     - Análisis de riesgo (volatilidad)\n\
     \n\
     Mercado Mexicano\n\
     La Bolsa Mexicana de Valores (BMV) es la segunda bolsa de valores más grande de \
     Latinoamérica después de la Bolsa de São Paulo. La moneda utilizada es el peso \
     mexicano (MXN).\n\
     \n\
     El principal índice bursátil es el S&P/BMV IPC (Índice de Precios y Cotizaciones), \
     que agrupa a las 35 empresas más líquidas del mercado mexicano.\n"
}
