use crate::config::MapConfig;
use crate::data::DataStore;
use crate::error::LoadError;
use crate::filter::{status_options, SelectionParams, StampFilter, StampOptions, VisitFilter};
use crate::map::{stamp_map, visit_map, MapView};
use crate::render::{self, Links, StampsPage, VisitsPage};
use crate::table::{stamp_table, TableData};
use crate::types::{StampRecord, VisitRecord, VisitStatus};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Everything the stamps page shows for one filter selection.
pub struct StampsView {
    pub options: StampOptions,
    pub filter: StampFilter,
    pub filtered: Vec<StampRecord>,
    pub map: MapView,
    pub table: TableData,
}

impl StampsView {
    pub fn build(store: &DataStore, map_config: &MapConfig, params: &SelectionParams) -> Result<Self, LoadError> {
        let stamps = store.stamps.get()?;
        let region_colors = store.region_colors.get()?;

        let options = StampOptions::from_records(&stamps);
        let filter = params.stamp_filter(&options);
        let filtered = filter.apply(&stamps);
        debug!("{} of {} stamps match the filters", filtered.len(), stamps.len());

        let map = stamp_map(&filtered, &region_colors, map_config);
        let table = stamp_table(&filtered);
        Ok(StampsView { options, filter, filtered, map, table })
    }

    pub fn render(&self, links: &Links) -> String {
        render::stamps_page(
            &StampsPage {
                options: &self.options,
                filter: &self.filter,
                map: &self.map,
                table: &self.table,
            },
            links,
        )
    }
}

pub struct VisitsView {
    pub options: Vec<VisitStatus>,
    pub filter: VisitFilter,
    pub filtered: Vec<VisitRecord>,
    pub map: MapView,
}

impl VisitsView {
    pub fn build(store: &DataStore, map_config: &MapConfig, params: &SelectionParams) -> Result<Self, LoadError> {
        let visits = store.visits.get()?;
        let visit_colors = store.visit_colors.get()?;

        let options = status_options(&visits);
        let filter = params.visit_filter(&options);
        let filtered = filter.apply(&visits);
        debug!("{} of {} visits match the filters", filtered.len(), visits.len());

        let map = visit_map(&filtered, &visit_colors, map_config);
        Ok(VisitsView { options, filter, filtered, map })
    }

    pub fn render(&self, links: &Links) -> String {
        render::visits_page(
            &VisitsPage {
                options: &self.options,
                filter: &self.filter,
                map: &self.map,
            },
            links,
        )
    }
}

/// Write home, stamps and visits pages with every option selected.
pub fn write_static_site(map_config: &MapConfig, store: &DataStore, out: &Path) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("Failed to create output directory: {:?}", out))?;
    let links = Links::static_files();
    let params = SelectionParams::default();

    let stamps = StampsView::build(store, map_config, &params)?;
    let visits = VisitsView::build(store, map_config, &params)?;

    let pages = [
        (links.home.clone(), render::home_page(&links)),
        (links.stamps.clone(), stamps.render(&links)),
        (links.visits.clone(), visits.render(&links)),
    ];
    for (name, html) in pages {
        let path = out.join(&name);
        fs::write(&path, html).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Wrote {:?}", path);
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Glyph;

    #[test]
    fn northeast_selection_keeps_only_acadia() {
        let (_dir, paths) = fixtures::project();
        let store = DataStore::new(&paths);
        let params = SelectionParams::from_query(Some("region=Northeast"));

        let view = StampsView::build(&store, &MapConfig::default(), &params).unwrap();
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.filtered[0].name, "Acadia");
        assert_eq!(view.map.markers.len(), 1);
        assert_eq!(view.map.markers[0].icon.background_color, "green");
        assert_eq!(view.map.markers[0].icon.glyph, Glyph::Check);
        assert_eq!(view.table.rows.len(), 1);
    }

    #[test]
    fn evan_status_selection_keeps_only_evan_row() {
        let (_dir, paths) = fixtures::project();
        let store = DataStore::new(&paths);
        let params = SelectionParams::from_query(Some("status=Evan"));

        let view = VisitsView::build(&store, &MapConfig::default(), &params).unwrap();
        assert_eq!(view.options, vec![VisitStatus::Evan, VisitStatus::Kelsey]);
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.filtered[0].name, "Arches");
        assert_eq!(view.filtered[0].status.label(), "Evan");
        assert_eq!(view.map.markers[0].icon.background_color, "red");
        assert_eq!(view.map.markers[0].icon.glyph, Glyph::Star);
    }

    #[test]
    fn static_site_has_no_filter_form() {
        let (dir, paths) = fixtures::project();
        let store = DataStore::new(&paths);
        let out = dir.path().join("site");

        write_static_site(&MapConfig::default(), &store, &out).unwrap();

        for page in ["index.html", "stamps.html", "visits.html"] {
            let html = std::fs::read_to_string(out.join(page)).unwrap();
            assert!(!html.contains("<form"), "{} has a form", page);
            assert!(!html.contains(r#"name="applied""#), "{} has filter fields", page);
        }
        let stamps = std::fs::read_to_string(out.join("stamps.html")).unwrap();
        assert!(stamps.contains("<td>Acadia</td>"));
        assert!(stamps.contains("<td>Zion</td>"));
    }

    #[test]
    fn blank_year_row_is_hidden_not_fatal() {
        let (_dir, paths) = fixtures::project();
        std::fs::write(
            &paths.stamps_csv,
            "name,year,region,latitude,longitude,visited\n\
             Acadia,2019,Northeast,44.35,-68.21,Yes\n\
             Zion,,Southwest,37.30,-113.05,No\n\
             Arches,2020,,38.73,-109.59,Yes\n",
        )
        .unwrap();
        let store = DataStore::new(&paths);

        let view = StampsView::build(&store, &MapConfig::default(), &SelectionParams::default()).unwrap();
        assert_eq!(view.options.years, vec![2019, 2020]);
        assert_eq!(view.options.regions, vec!["Northeast", "Southwest"]);
        let names: Vec<&str> = view.filtered.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Acadia"]);
    }

    #[test]
    fn missing_color_config_fails_the_page() {
        let (_dir, paths) = fixtures::project();
        std::fs::remove_file(&paths.region_colors).unwrap();
        let store = DataStore::new(&paths);

        let result = StampsView::build(&store, &MapConfig::default(), &SelectionParams::default());
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }
}
