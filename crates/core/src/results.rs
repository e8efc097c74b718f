use crate::map::MapSurface;
use crate::models::{PlaceId, PlaceResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub visible: usize,
    pub hidden: usize,
}

/// Places from the last successful search, in provider rank order.
#[derive(Debug, Default)]
pub struct ResultList {
    places: Vec<PlaceResult>,
    selected: Option<PlaceId>,
}

impl ResultList {
    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceResult> {
        self.places.iter()
    }

    pub fn selected(&self) -> Option<PlaceId> {
        self.selected
    }

    pub fn select(&mut self, id: PlaceId) -> Option<&PlaceResult> {
        let place = self.places.iter().find(|place| place.id == id)?;
        self.selected = Some(id);
        Some(place)
    }

    /// Swaps in a new result set. The previous places must already have been
    /// cleared so their markers are not leaked.
    pub fn replace(&mut self, places: Vec<PlaceResult>) {
        debug_assert!(self.places.is_empty(), "replace called on a non-empty result list");
        self.places = places;
        self.selected = None;
    }

    /// Drops every place and destroys its marker.
    pub fn clear<M: MapSurface>(&mut self, map: &mut M) {
        for place in self.places.drain(..) {
            if let Some(marker) = place.marker {
                map.remove_marker(marker);
            }
        }
        self.selected = None;
    }

    /// Attaches the markers of places whose name contains `filter` (ignoring
    /// case) and detaches the rest. An empty filter shows everything.
    pub fn apply_filter<M: MapSurface>(&self, filter: &str, map: &mut M) -> FilterSummary {
        let needle = filter.to_lowercase();
        let mut summary = FilterSummary::default();

        for place in &self.places {
            let visible = needle.is_empty() || place.matches_filter(&needle);
            if visible {
                summary.visible += 1;
            } else {
                summary.hidden += 1;
            }

            if let Some(marker) = &place.marker {
                if visible {
                    map.attach(marker);
                } else {
                    map.detach(marker);
                }
            }
        }

        summary
    }

    pub fn visible<'a>(&'a self, filter: &str) -> impl Iterator<Item = &'a PlaceResult> + 'a {
        let needle = filter.to_lowercase();
        self.places
            .iter()
            .filter(move |place| needle.is_empty() || place.matches_filter(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{HeadlessMap, MapView};
    use crate::models::Coordinates;
    use serde_json::json;

    fn loaded(map: &mut HeadlessMap, names: &[&str]) -> ResultList {
        let places = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let coordinates = Coordinates::new(index as f64, 0.0);
                PlaceResult {
                    id: PlaceId(index as u64 + 1),
                    name: name.to_string(),
                    coordinates,
                    raw_metadata: json!({}),
                    marker: Some(map.add_marker(coordinates, name)),
                }
            })
            .collect();
        let mut list = ResultList::default();
        list.replace(places);
        list
    }

    fn map() -> HeadlessMap {
        HeadlessMap::new(MapView {
            center: Coordinates::new(0.0, 0.0),
            zoom: 15,
        })
    }

    #[test]
    fn filter_attaches_exactly_the_matching_markers() {
        let mut map = map();
        let list = loaded(&mut map, &["Philz Coffee", "Tartine Bakery", "Coffee Bar"]);

        let summary = list.apply_filter("COFFEE", &mut map);
        assert_eq!(summary, FilterSummary { visible: 2, hidden: 1 });
        assert_eq!(map.attached_labels(), vec!["Philz Coffee", "Coffee Bar"]);
        assert_eq!(map.marker_count(), 3);

        let visible: Vec<_> = list.visible("coffee").map(|place| place.name.as_str()).collect();
        assert_eq!(visible, vec!["Philz Coffee", "Coffee Bar"]);
    }

    #[test]
    fn empty_filter_restores_every_marker() {
        let mut map = map();
        let list = loaded(&mut map, &["Philz Coffee", "Tartine Bakery"]);

        list.apply_filter("zzz", &mut map);
        assert_eq!(map.attached_count(), 0);

        let summary = list.apply_filter("", &mut map);
        assert_eq!(summary.visible, 2);
        assert_eq!(map.attached_count(), 2);
    }

    #[test]
    fn clear_destroys_markers_and_selection() {
        let mut map = map();
        let mut list = loaded(&mut map, &["Philz Coffee", "Tartine Bakery"]);
        assert!(list.select(PlaceId(2)).is_some());

        list.clear(&mut map);
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
        assert_eq!(map.marker_count(), 0);
    }

    #[test]
    fn selecting_an_unknown_place_keeps_previous_selection() {
        let mut map = map();
        let mut list = loaded(&mut map, &["Philz Coffee"]);
        list.select(PlaceId(1));
        assert!(list.select(PlaceId(9)).is_none());
        assert_eq!(list.selected(), Some(PlaceId(1)));
    }
}
