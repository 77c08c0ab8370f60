//! Screen coordinates of the waypoint menu, for both render modes.

use crate::game::area::WaypointAddress;

// ── Modern graphics ────────────────────────────────────────────────

pub const WP_TAB_START_X: i32 = 131;
pub const WP_TAB_START_Y: i32 = 148;
pub const WP_TAB_SIZE_X: i32 = 57;
pub const WP_LIST_POSITION_X: i32 = 200;
pub const WP_LIST_START_Y: i32 = 158;
pub const WP_AREA_BTN_HEIGHT: i32 = 41;

// ── Legacy graphics ────────────────────────────────────────────────

pub const WP_TAB_START_X_CLASSIC: i32 = 83;
pub const WP_TAB_START_Y_CLASSIC: i32 = 107;
pub const WP_TAB_SIZE_X_CLASSIC: i32 = 70;
pub const WP_LIST_POSITION_X_CLASSIC: i32 = 179;
pub const WP_LIST_START_Y_CLASSIC: i32 = 120;
pub const WP_AREA_BTN_HEIGHT_CLASSIC: i32 = 26;

/// Click points for a destination: the act tab first, then the list row.
pub fn waypoint_click_points(addr: WaypointAddress, legacy: bool) -> ((i32, i32), (i32, i32)) {
    let tab = addr.tab as i32;
    let row = addr.row as i32;

    if legacy {
        let tab_x = WP_TAB_START_X_CLASSIC + (tab - 1) * WP_TAB_SIZE_X_CLASSIC + WP_TAB_SIZE_X_CLASSIC / 2;
        let row_y = WP_LIST_START_Y_CLASSIC + (row - 1) * WP_AREA_BTN_HEIGHT_CLASSIC + WP_AREA_BTN_HEIGHT_CLASSIC / 2;
        ((tab_x, WP_TAB_START_Y_CLASSIC), (WP_LIST_POSITION_X_CLASSIC, row_y))
    } else {
        let tab_x = WP_TAB_START_X + (tab - 1) * WP_TAB_SIZE_X + WP_TAB_SIZE_X / 2;
        let row_y = WP_LIST_START_Y + (row - 1) * WP_AREA_BTN_HEIGHT + WP_AREA_BTN_HEIGHT / 2;
        ((tab_x, WP_TAB_START_Y), (WP_LIST_POSITION_X, row_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tab_first_row() {
        let ((tab_x, tab_y), (row_x, row_y)) =
            waypoint_click_points(WaypointAddress { tab: 1, row: 1 }, false);
        assert_eq!(tab_x, WP_TAB_START_X + WP_TAB_SIZE_X / 2);
        assert_eq!(tab_y, WP_TAB_START_Y);
        assert_eq!(row_x, WP_LIST_POSITION_X);
        assert_eq!(row_y, WP_LIST_START_Y + WP_AREA_BTN_HEIGHT / 2);
    }

    #[test]
    fn legacy_layout_is_distinct() {
        let modern = waypoint_click_points(WaypointAddress { tab: 3, row: 4 }, false);
        let classic = waypoint_click_points(WaypointAddress { tab: 3, row: 4 }, true);
        assert_ne!(modern, classic);
    }
}
