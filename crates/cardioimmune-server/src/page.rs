//! HTML page for the browser dashboard.
//!
//! The page is rebuilt from the query string on every request. The cell-type
//! form submits only `cell`, so changing it drops the gene and the new cell
//! type's first marker is shown.

use cardioimmune_core::DashboardView;

use crate::svg::{self, escape};

pub const PAGE_TITLE: &str = "CardioImmune Atlas v2";
pub const PAGE_HEADING: &str = "Immune Cell Marker Explorer";

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:960px;color:#222}\
label{display:block;margin-top:1rem;font-weight:bold}\
select{margin-top:.25rem;padding:.25rem;min-width:16rem}\
.info{background:#e8f1fb;border-left:4px solid #1c83e1;padding:.75rem 1rem;margin:1rem 0}\
.note{color:#888;font-size:.85rem}";

fn options(values: &[&str], selected: Option<&str>) -> String {
    values
        .iter()
        .map(|v| {
            let sel = if Some(*v) == selected { " selected" } else { "" };
            let v = escape(v);
            format!(r#"<option value="{v}"{sel}>{v}</option>"#)
        })
        .collect()
}

/// Render the full page for one dashboard state.
pub fn render(view: &DashboardView, source: &str, simulated: bool) -> String {
    let cell = view.selected_cell_type.unwrap_or_default();
    let description = view.description.map(escape).unwrap_or_default();
    let note = if simulated {
        format!(
            r#"<p class="note">Expression values are simulated ({}), not atlas measurements.</p>"#,
            escape(source)
        )
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
<h3>{PAGE_HEADING}</h3>
<form method="get" action="/">
<label for="cell">Select an immune cell type:</label>
<select id="cell" name="cell" onchange="this.form.submit()">{cell_options}</select>
<noscript><button type="submit">Show</button></noscript>
</form>
<div class="info">{description}</div>
<form method="get" action="/">
<input type="hidden" name="cell" value="{cell}">
<label for="gene">Select a marker gene:</label>
<select id="gene" name="gene" onchange="this.form.submit()">{gene_options}</select>
<noscript><button type="submit">Plot</button></noscript>
</form>
<div class="chart">{chart}</div>
{note}
</body>
</html>
"#,
        cell_options = options(&view.cell_types, view.selected_cell_type),
        cell = escape(cell),
        gene_options = options(view.genes, view.selected_gene),
        chart = svg::render(&view.figure),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cardioimmune_core::{Catalog, Dashboard, load_expression_data};

    fn page(cell: Option<&str>, gene: Option<&str>) -> String {
        let table = Arc::new(load_expression_data());
        let dash = Dashboard::with_selection(Catalog::builtin(), table, cell, gene);
        render(&dash.view(), "GTEx Simulated", true)
    }

    #[test]
    fn default_page_shows_first_cell_type() {
        let html = page(None, None);
        assert!(html.contains("<title>CardioImmune Atlas v2</title>"));
        assert!(html.contains(PAGE_HEADING));
        assert!(html.contains(r#"<option value="Macrophages" selected>"#));
        assert!(html.contains(r#"<option value="CD68" selected>"#));
        assert!(html.contains(
            "Macrophages clear debris, regulate inflammation, and aid tissue repair."
        ));
        assert!(html.contains("simulated"));
    }

    #[test]
    fn gene_dropdown_lists_only_selected_markers() {
        let html = page(Some("Monocytes"), None);
        let gene_select = html.split(r#"id="gene""#).nth(1).unwrap();
        let gene_select = gene_select.split("</select>").next().unwrap();
        assert_eq!(gene_select.matches("<option").count(), 3);
        assert!(gene_select.contains(r#"<option value="CD14" selected>"#));
        assert!(gene_select.contains("FCN1"));
        assert!(gene_select.contains("LYZ"));
        assert!(!gene_select.contains("CD68"));
    }

    #[test]
    fn cell_names_with_plus_are_kept() {
        let html = page(Some("CD4+ T cells"), Some("FOXP3"));
        assert!(html.contains(r#"<input type="hidden" name="cell" value="CD4+ T cells">"#));
        assert!(html.contains(r#"<option value="FOXP3" selected>"#));
        assert!(html.contains("FOXP3 Expression in Heart Tissues"));
    }

    #[test]
    fn cell_form_does_not_carry_gene() {
        let html = page(Some("Macrophages"), Some("MARCO"));
        let first_form = html.split("</form>").next().unwrap();
        assert!(!first_form.contains(r#"name="gene""#));
    }
}
