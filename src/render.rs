//! HTML page rendering.
//!
//! Pages are plain strings: a sidebar form for the filters, a Leaflet map fed
//! from an embedded JSON `MapView`, and a read-only table.

use crate::filter::{StampFilter, StampOptions, VisitFilter};
use crate::map::MapView;
use crate::table::{format_year, TableData};
use crate::types::VisitStatus;
use std::fmt::{self, Write};

const LEAFLET_ASSETS: &str = r#"
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css" />
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/gh/marslan390/BeautifyMarker/leaflet-beautify-marker-icon.min.css" />
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://cdn.jsdelivr.net/gh/marslan390/BeautifyMarker/leaflet-beautify-marker-icon.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/leaflet.fullscreen@3.0.0/Control.FullScreen.min.js"></script>"#;

const PAGE_CSS: &str = r#"
    body { margin: 0; font-family: "Source Sans Pro", sans-serif; color: #31333f; }
    .layout { display: flex; min-height: 100vh; }
    .sidebar { width: 280px; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }
    .sidebar label { display: block; margin: 1rem 0 0.25rem; font-weight: 600; }
    .sidebar select { width: 100%; min-height: 6rem; }
    .sidebar button { margin-top: 1rem; }
    .content { flex: 1; padding: 1.5rem 3rem; }
    nav a { margin-right: 1rem; }
    .tabs button { border: none; background: none; padding: 0.5rem 1rem; cursor: pointer; }
    .tabs button.active { border-bottom: 2px solid #ff4b4b; color: #ff4b4b; }
    .tab { display: none; }
    .tab.active { display: block; }
    .notice { padding: 0.75rem 1rem; background: #fff8e1; border-left: 4px solid #ffbd45; }
    .error { padding: 0.75rem 1rem; background: #ffecec; border-left: 4px solid #ff4b4b; }
    table.grid { width: 100%; border-collapse: collapse; }
    table.grid th, table.grid td { border: 1px solid #e6e9ef; padding: 0.25rem 0.5rem; text-align: left; }
    table.grid th { background: #fafafa; }"#;

const MAP_SCRIPT: &str = r#"
<script>
(function () {
  const view = JSON.parse(document.getElementById("map-data").textContent);
  const map = L.map("map").setView(view.center, view.zoom);
  L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    attribution: "&copy; OpenStreetMap contributors"
  }).addTo(map);
  view.markers.forEach(function (m) {
    const icon = L.BeautifyIcon.icon({
      icon: m.icon.glyph,
      iconShape: m.icon.shape,
      borderColor: m.icon.border_color,
      backgroundColor: m.icon.background_color
    });
    L.marker([m.latitude, m.longitude], { icon: icon })
      .bindTooltip(m.tooltip)
      .bindPopup(m.popup)
      .addTo(map);
  });
  L.control.fullscreen({ position: view.fullscreen.position }).addTo(map);
  window.parkMap = map;
})();
</script>"#;

const TAB_SCRIPT: &str = r#"
<script>
document.querySelectorAll(".tabs button").forEach(function (button) {
  button.addEventListener("click", function () {
    document.querySelectorAll(".tabs button, .tab").forEach(function (el) {
      el.classList.remove("active");
    });
    button.classList.add("active");
    document.getElementById(button.dataset.tab).classList.add("active");
    if (window.parkMap) { window.parkMap.invalidateSize(); }
  });
});
</script>"#;

/// Where the navigation links and filter forms point.
///
/// Static pages cannot read a query string, so they get no filter form.
#[derive(Debug, Clone)]
pub struct Links {
    pub home: String,
    pub stamps: String,
    pub visits: String,
    pub interactive: bool,
}

impl Links {
    pub fn server() -> Self {
        Links {
            home: "/".to_string(),
            stamps: "/stamps".to_string(),
            visits: "/visits".to_string(),
            interactive: true,
        }
    }

    pub fn static_files() -> Self {
        Links {
            home: "index.html".to_string(),
            stamps: "stamps.html".to_string(),
            visits: "visits.html".to_string(),
            interactive: false,
        }
    }
}

pub struct StampsPage<'a> {
    pub options: &'a StampOptions,
    pub filter: &'a StampFilter,
    pub map: &'a MapView,
    pub table: &'a TableData,
}

pub struct VisitsPage<'a> {
    pub options: &'a [VisitStatus],
    pub filter: &'a VisitFilter,
    pub map: &'a MapView,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn home_page(links: &Links) -> String {
    let body = format!(
        r#"<div class="content">
    {nav}
    <h1>National Park Tracking</h1>
    <p><a href="{stamps}">Passport Stamps</a> &middot; <a href="{visits}">Visits</a></p>
</div>"#,
        nav = render_nav(links),
        stamps = escape_html(&links.stamps),
        visits = escape_html(&links.visits),
    );
    document("National Parks", false, &body)
}

pub fn stamps_page(page: &StampsPage<'_>, links: &Links) -> String {
    let options = page.options;
    let filter = page.filter;

    let visited = multiselect(
        "visited",
        "Visited",
        options.visited.iter().map(|v| (v.as_str().to_string(), filter.visited.contains(v))),
    );
    let regions = multiselect(
        "region",
        "Select Region",
        options.regions.iter().map(|r| (r.clone(), filter.regions.contains(r))),
    );
    let years = multiselect(
        "year",
        "Select Year",
        options.years.iter().map(|y| (format_year(*y), filter.years.contains(y))),
    );

    let body = format!(
        r#"<div class="layout">
  {sidebar}
  <div class="content">
    {nav}
    <div class="tabs">
      <button type="button" class="active" data-tab="map-tab">Map View</button>
      <button type="button" data-tab="table-tab">Table View</button>
    </div>
    <div id="map-tab" class="tab active">
      <h2>National Park Passport Stamp Locations</h2>
      {map}
    </div>
    <div id="table-tab" class="tab">
      <h2>Stamp Details Table</h2>
      {table}
    </div>
  </div>
</div>
{tabs}"#,
        sidebar = sidebar("Filter Stamps", &links.stamps, links.interactive, &[visited, regions, years]),
        nav = render_nav(links),
        map = render_map(page.map),
        table = render_table(page.table),
        tabs = TAB_SCRIPT,
    );
    document("National Parks Passport Stamps", true, &body)
}

pub fn visits_page(page: &VisitsPage<'_>, links: &Links) -> String {
    let statuses = multiselect(
        "status",
        "Select Status",
        page.options
            .iter()
            .map(|s| (s.label().to_string(), page.filter.statuses.contains(s))),
    );

    let body = format!(
        r#"<div class="layout">
  {sidebar}
  <div class="content">
    {nav}
    <h2>National Park Visiting Records</h2>
    {map}
  </div>
</div>"#,
        sidebar = sidebar("Filter Visit", &links.visits, links.interactive, &[statuses]),
        nav = render_nav(links),
        map = render_map(page.map),
    );
    document("National Park Visiting", true, &body)
}

pub fn error_page(err: &dyn fmt::Display, links: &Links) -> String {
    let body = format!(
        r#"<div class="content">
    {nav}
    <div class="error"><strong>Could not load dashboard data.</strong><br />{message}</div>
</div>"#,
        nav = render_nav(links),
        message = escape_html(&err.to_string()),
    );
    document("National Parks", false, &body)
}

fn document(title: &str, with_map: bool, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>{assets}
    <style>{css}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        assets = if with_map { LEAFLET_ASSETS } else { "" },
        css = PAGE_CSS,
        body = body,
    )
}

fn render_nav(links: &Links) -> String {
    format!(
        r#"<nav><a href="{}">Home</a><a href="{}">Stamps</a><a href="{}">Visits</a></nav>"#,
        escape_html(&links.home),
        escape_html(&links.stamps),
        escape_html(&links.visits),
    )
}

fn sidebar(header: &str, action: &str, interactive: bool, controls: &[String]) -> String {
    if !interactive {
        return format!(
            r#"<aside class="sidebar">
    <h2>{header}</h2>
    <p class="notice">Snapshot with every option selected. Run <code>park_tracker serve</code> to filter.</p>
  </aside>"#,
            header = escape_html(header),
        );
    }
    format!(
        r#"<aside class="sidebar">
    <h2>{header}</h2>
    <form method="get" action="{action}">
      <input type="hidden" name="applied" value="1" />
      {controls}
      <button type="submit">Apply</button>
    </form>
  </aside>"#,
        header = escape_html(header),
        action = escape_html(action),
        controls = controls.join("\n      "),
    )
}

fn multiselect(name: &str, label: &str, options: impl Iterator<Item = (String, bool)>) -> String {
    let mut html = format!(
        r#"<label for="{name}">{label}</label><select id="{name}" name="{name}" multiple>"#,
        name = name,
        label = escape_html(label),
    );
    for (value, selected) in options {
        let value = escape_html(&value);
        let selected = if selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{value}"{selected}>{value}</option>"#);
    }
    html.push_str("</select>");
    html
}

fn render_map(view: &MapView) -> String {
    let json = serde_json::to_string(view).unwrap_or_else(|_| "null".to_string());
    let notice = if view.is_empty() {
        r#"<p class="notice">No parks match the current filters.</p>"#
    } else {
        ""
    };
    format!(
        r#"{notice}<div id="map" style="height: {height}px; width: 100%; max-width: {width}px;"></div>
<script id="map-data" type="application/json">{json}</script>{script}"#,
        notice = notice,
        height = view.height,
        width = view.width,
        // Keep names like "</script>" from closing the data block early.
        json = json.replace("</", "<\\/"),
        script = MAP_SCRIPT,
    )
}

fn render_table(table: &TableData) -> String {
    let mut html = String::from(r#"<table class="grid"><thead><tr>"#);
    for header in &table.headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
