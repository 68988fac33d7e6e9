//! Lane geometry: how tall each lane is and where it sits in the lane
//! container, stacked top to bottom.

use crate::config::RoadmapConfig;
use crate::model::ProjectStore;

use super::packing::{pack_lanes, PackedLane};

#[derive(Debug, Clone, PartialEq)]
pub struct LaneGeometry {
    pub team: String,
    pub row_count: usize,
    pub pixel_height: f32,
    /// Offset of the lane's top edge from the top of the lane container.
    pub screen_top: f32,
    pub screen_bottom: f32,
}

/// A lane being grown live while an item is dragged below its last row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneExpansion {
    pub team: String,
    /// Rows the lane has to show, including the one being dragged into.
    pub rows: usize,
}

/// Stack lanes vertically. Only the lane named by `expansion` may grow beyond
/// its packed height.
pub fn stack_lanes(
    lanes: &[PackedLane],
    config: &RoadmapConfig,
    expansion: Option<&LaneExpansion>,
) -> Vec<LaneGeometry> {
    let mut top = 0.0;
    lanes
        .iter()
        .map(|lane| {
            let mut pixel_height = config.lane_height_for_rows(lane.row_count());
            if let Some(exp) = expansion.filter(|e| e.team == lane.team) {
                pixel_height = pixel_height.max(config.lane_height_for_rows(exp.rows));
            }
            let geometry = LaneGeometry {
                team: lane.team.clone(),
                row_count: lane.row_count(),
                pixel_height,
                screen_top: top,
                screen_bottom: top + pixel_height,
            };
            top += pixel_height;
            geometry
        })
        .collect()
}

/// The at-rest roadmap layout built from the store.
#[derive(Debug, Clone, Default)]
pub struct RoadmapLayout {
    pub lanes: Vec<PackedLane>,
    pub geometry: Vec<LaneGeometry>,
}

impl RoadmapLayout {
    /// Pack and stack every visible lane. Lanes follow store team order.
    pub fn build(store: &ProjectStore, visible: &[String], config: &RoadmapConfig) -> Self {
        let order: Vec<String> = store
            .teams()
            .iter()
            .map(|t| t.name.clone())
            .filter(|name| visible.contains(name))
            .collect();
        let lanes = pack_lanes(&store.intervals(), &order);
        let geometry = stack_lanes(&lanes, config, None);
        tracing::debug!(
            lanes = lanes.len(),
            revision = store.revision(),
            "roadmap layout rebuilt"
        );
        Self { lanes, geometry }
    }

    /// Geometry with a live expansion applied; the at-rest geometry otherwise.
    pub fn geometry_with(
        &self,
        config: &RoadmapConfig,
        expansion: Option<&LaneExpansion>,
    ) -> Vec<LaneGeometry> {
        match expansion {
            Some(_) => stack_lanes(&self.lanes, config, expansion),
            None => self.geometry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlanningInterval, Project};
    use crate::roadmap::packing::pack;
    use chrono::NaiveDate;
    use egui::Color32;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn lane(team: &str, spans: &[(NaiveDate, NaiveDate)]) -> PackedLane {
        let intervals: Vec<_> = spans
            .iter()
            .enumerate()
            .map(|(i, (s, e))| PlanningInterval::new(Uuid::from_u128(i as u128 + 1), team, *s, *e))
            .collect();
        let packing = pack(&intervals);
        PackedLane {
            team: team.to_string(),
            intervals,
            packing,
        }
    }

    #[test]
    fn lanes_stack_with_minimum_height() {
        let config = RoadmapConfig::default();
        let overlapping = [
            (d(2025, 1, 1), d(2025, 2, 1)),
            (d(2025, 1, 5), d(2025, 2, 1)),
            (d(2025, 1, 9), d(2025, 2, 1)),
        ];
        let lanes = vec![lane("Empty", &[]), lane("Busy", &overlapping)];
        let geometry = stack_lanes(&lanes, &config, None);

        assert_eq!(geometry[0].row_count, 0);
        assert_eq!(geometry[0].pixel_height, config.min_lane_height);
        assert_eq!(geometry[0].screen_top, 0.0);
        assert_eq!(geometry[1].row_count, 3);
        assert_eq!(geometry[1].pixel_height, 3.0 * config.row_height + config.lane_padding);
        assert_eq!(geometry[1].screen_top, config.min_lane_height);
        assert_eq!(
            geometry[1].screen_bottom,
            geometry[1].screen_top + geometry[1].pixel_height
        );
    }

    #[test]
    fn expansion_only_grows_its_own_lane() {
        let config = RoadmapConfig::default();
        let one = [(d(2025, 1, 1), d(2025, 2, 1))];
        let lanes = vec![lane("Trading", &one), lane("Risk", &one)];
        let at_rest = stack_lanes(&lanes, &config, None);
        let expansion = LaneExpansion {
            team: "Trading".into(),
            rows: 4,
        };
        let expanded = stack_lanes(&lanes, &config, Some(&expansion));

        assert_eq!(expanded[0].pixel_height, 4.0 * config.row_height + config.lane_padding);
        assert!(expanded[0].pixel_height > at_rest[0].pixel_height);
        assert_eq!(expanded[1].pixel_height, at_rest[1].pixel_height);
        assert_eq!(expanded[1].screen_top, expanded[0].screen_bottom);
        // Row counts stay those of the at-rest packing.
        assert_eq!(expanded[0].row_count, 1);
    }

    #[test]
    fn build_respects_team_order_and_visibility() {
        let mut store = ProjectStore::new("Layout");
        store.add_team("Trading", Color32::BLUE).unwrap();
        store.add_team("Risk", Color32::RED).unwrap();
        store.add_team("Platform", Color32::GREEN).unwrap();
        store
            .add_project(Project::new("A", "Risk", d(2025, 1, 1), d(2025, 1, 15)))
            .unwrap();
        store
            .add_project(Project::new("B", "Risk", d(2025, 1, 10), d(2025, 1, 20)))
            .unwrap();
        store
            .add_project(Project::unscheduled("C", "Risk"))
            .unwrap();

        let visible = vec!["Risk".to_string(), "Trading".to_string()];
        let layout = RoadmapLayout::build(&store, &visible, &RoadmapConfig::default());
        let teams: Vec<_> = layout.lanes.iter().map(|l| l.team.as_str()).collect();
        assert_eq!(teams, vec!["Trading", "Risk"]);
        let risk = &layout.lanes[1];
        assert_eq!(risk.row_count(), 2);
        assert_eq!(risk.intervals.len(), 2);
        assert!(layout.lanes.iter().all(|l| l.team != "Platform"));
        assert_eq!(layout.geometry[1].screen_top, layout.geometry[0].screen_bottom);
    }
}
