use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Owned reference to a marker living on a [`MapSurface`]. Deliberately not
/// `Clone`: whoever holds the handle is the only one who can remove the marker.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

/// The map widget. The controller is the only writer.
pub trait MapSurface {
    fn set_view(&mut self, view: MapView);

    /// Places a new marker and attaches it to the map.
    fn add_marker(&mut self, position: Coordinates, label: &str) -> MarkerHandle;

    fn attach(&mut self, marker: &MarkerHandle);

    /// Hides the marker without destroying it.
    fn detach(&mut self, marker: &MarkerHandle);

    fn remove_marker(&mut self, marker: MarkerHandle);

    fn open_info_window(&mut self, marker: &MarkerHandle, content: &str);
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerState {
    pub position: Coordinates,
    pub label: String,
    pub attached: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InfoWindow {
    pub marker: u64,
    pub content: String,
}

/// In-process map used by the terminal front end and by tests. Keeps every
/// marker it handed out until the handle comes back through `remove_marker`.
#[derive(Debug)]
pub struct HeadlessMap {
    view: MapView,
    markers: BTreeMap<u64, MarkerState>,
    info_window: Option<InfoWindow>,
    next_marker: u64,
}

impl HeadlessMap {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            markers: BTreeMap::new(),
            info_window: None,
            next_marker: 1,
        }
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn attached_count(&self) -> usize {
        self.markers.values().filter(|marker| marker.attached).count()
    }

    pub fn attached_labels(&self) -> Vec<&str> {
        self.markers
            .values()
            .filter(|marker| marker.attached)
            .map(|marker| marker.label.as_str())
            .collect()
    }

    pub fn info_window(&self) -> Option<&InfoWindow> {
        self.info_window.as_ref()
    }
}

impl MapSurface for HeadlessMap {
    fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    fn add_marker(&mut self, position: Coordinates, label: &str) -> MarkerHandle {
        let id = self.next_marker;
        self.next_marker += 1;
        self.markers.insert(
            id,
            MarkerState {
                position,
                label: label.to_string(),
                attached: true,
            },
        );
        MarkerHandle(id)
    }

    fn attach(&mut self, marker: &MarkerHandle) {
        if let Some(state) = self.markers.get_mut(&marker.0) {
            state.attached = true;
        }
    }

    fn detach(&mut self, marker: &MarkerHandle) {
        if let Some(state) = self.markers.get_mut(&marker.0) {
            state.attached = false;
        }
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.remove(&marker.0);
        if self
            .info_window
            .as_ref()
            .is_some_and(|window| window.marker == marker.0)
        {
            self.info_window = None;
        }
    }

    fn open_info_window(&mut self, marker: &MarkerHandle, content: &str) {
        self.info_window = Some(InfoWindow {
            marker: marker.0,
            content: content.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> HeadlessMap {
        HeadlessMap::new(MapView {
            center: Coordinates::new(0.0, 0.0),
            zoom: 4,
        })
    }

    #[test]
    fn detach_hides_without_destroying() {
        let mut map = map();
        let handle = map.add_marker(Coordinates::new(1.0, 2.0), "Cafe");
        map.detach(&handle);
        assert_eq!(map.marker_count(), 1);
        assert_eq!(map.attached_count(), 0);

        map.attach(&handle);
        assert_eq!(map.attached_labels(), vec!["Cafe"]);
    }

    #[test]
    fn removing_a_marker_closes_its_info_window() {
        let mut map = map();
        let first = map.add_marker(Coordinates::new(1.0, 2.0), "Cafe");
        let second = map.add_marker(Coordinates::new(1.0, 2.1), "Bakery");
        map.open_info_window(&first, "Cafe");

        map.remove_marker(second);
        assert!(map.info_window().is_some());

        map.remove_marker(first);
        assert!(map.info_window().is_none());
        assert_eq!(map.marker_count(), 0);
    }
}
