//! Presentation-facing view model: the [`ViewState`] reducer and the derived token sequence.
//!
//! Both are pure. Consumers hold a [`ViewState`], feed user intents through [`reduce`], forward
//! any returned [`PollerCommand`] to the poller, and call [`derive_view`] whenever the token set
//! or the view state changes.

use crate::{
    config::DEFAULT_REFRESH_INTERVAL,
    poller::PollerCommand,
    token::{EnrichedToken, TokenId},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeSet, time::Duration};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Display)]
pub enum SortField {
    #[display("Name")]
    Name,
    #[display("Price")]
    Price,
    #[display("Holders")]
    Holders,
    #[display("24h Change")]
    Change24h,
    #[display("Market Cap")]
    MarketCap,
    #[display("24h Volume")]
    Volume24h,
    #[display("Listing Time")]
    ListingTime,
    #[display("Liquidity")]
    Liquidity,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Name,
        SortField::Price,
        SortField::Holders,
        SortField::Change24h,
        SortField::MarketCap,
        SortField::Volume24h,
        SortField::ListingTime,
        SortField::Liquidity,
    ];

    /// Ascending comparison of two tokens by this field.
    pub fn compare(&self, a: &EnrichedToken, b: &EnrichedToken) -> Ordering {
        match self {
            SortField::Name => a.name().cmp(b.name()),
            SortField::Price => compare_f64(a.price, b.price),
            SortField::Holders => a.holders.cmp(&b.holders),
            SortField::Change24h => compare_f64(a.change_24h, b.change_24h),
            SortField::MarketCap => compare_f64(a.market_cap, b.market_cap),
            SortField::Volume24h => compare_f64(a.volume_24h, b.volume_24h),
            SortField::ListingTime => a.listing_time().cmp(&b.listing_time()),
            SortField::Liquidity => compare_f64(a.liquidity(), b.liquidity()),
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Deserialize, Serialize, Display)]
pub enum SortDirection {
    #[display("asc")]
    Ascending,
    #[default]
    #[display("desc")]
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Toggleable table columns. The identity column (symbol and name) is always shown.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Display,
)]
pub enum Column {
    #[display("Price")]
    Price,
    #[display("Price Trend")]
    PriceTrend,
    #[display("Holders")]
    Holders,
    #[display("Holders Trend")]
    HoldersTrend,
    #[display("24h Change")]
    Change24h,
    #[display("Market Cap")]
    MarketCap,
    #[display("24h Volume")]
    Volume24h,
    #[display("Liquidity")]
    Liquidity,
    #[display("Listed")]
    ListingTime,
}

impl Column {
    /// Display order.
    pub const ALL: [Column; 9] = [
        Column::Price,
        Column::PriceTrend,
        Column::Holders,
        Column::HoldersTrend,
        Column::Change24h,
        Column::MarketCap,
        Column::Volume24h,
        Column::Liquidity,
        Column::ListingTime,
    ];

    pub const DEFAULT_VISIBLE: [Column; 6] = [
        Column::Price,
        Column::PriceTrend,
        Column::Holders,
        Column::HoldersTrend,
        Column::Change24h,
        Column::MarketCap,
    ];

    /// Sort field bound to this column header, if it is sortable.
    pub fn sort_field(&self) -> Option<SortField> {
        match self {
            Column::Price => Some(SortField::Price),
            Column::Holders => Some(SortField::Holders),
            Column::Change24h => Some(SortField::Change24h),
            Column::MarketCap => Some(SortField::MarketCap),
            Column::Volume24h => Some(SortField::Volume24h),
            Column::Liquidity => Some(SortField::Liquidity),
            Column::ListingTime => Some(SortField::ListingTime),
            Column::PriceTrend | Column::HoldersTrend => None,
        }
    }
}

/// User-controlled presentation state.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct ViewState {
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub visible_columns: BTreeSet<Column>,
    pub refresh_interval: Duration,
    pub selected: Option<TokenId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_field: SortField::MarketCap,
            sort_direction: SortDirection::Descending,
            visible_columns: Column::DEFAULT_VISIBLE.into_iter().collect(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            selected: None,
        }
    }
}

impl ViewState {
    pub fn with_refresh_interval(self, refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            ..self
        }
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.visible_columns.contains(&column)
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL
            .into_iter()
            .filter(|column| self.visible_columns.contains(column))
    }
}

/// User intent fed into [`reduce`].
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum ViewIntent {
    Search(String),
    SortBy(SortField),
    ToggleColumn(Column),
    SetRefreshInterval(Duration),
    Select(TokenId),
    ClearSelection,
    Refresh,
}

/// Result of [`reduce`]: the next state plus an optional command for the poller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transition {
    pub state: ViewState,
    pub command: Option<PollerCommand>,
}

impl Transition {
    fn state(state: ViewState) -> Self {
        Self {
            state,
            command: None,
        }
    }
}

pub fn reduce(state: &ViewState, intent: ViewIntent) -> Transition {
    let mut next = state.clone();

    match intent {
        ViewIntent::Search(search) => {
            next.search = search;
            Transition::state(next)
        }
        ViewIntent::SortBy(field) if field == state.sort_field => {
            next.sort_direction = state.sort_direction.flip();
            Transition::state(next)
        }
        ViewIntent::SortBy(field) => {
            next.sort_field = field;
            next.sort_direction = SortDirection::Descending;
            Transition::state(next)
        }
        ViewIntent::ToggleColumn(column) => {
            if !next.visible_columns.remove(&column) {
                next.visible_columns.insert(column);
            }
            Transition::state(next)
        }
        ViewIntent::SetRefreshInterval(period) => {
            next.refresh_interval = period;
            Transition {
                state: next,
                command: Some(PollerCommand::Reschedule(period)),
            }
        }
        ViewIntent::Select(id) => {
            next.selected = Some(id);
            Transition::state(next)
        }
        ViewIntent::ClearSelection => {
            next.selected = None;
            Transition::state(next)
        }
        ViewIntent::Refresh => Transition {
            state: next,
            command: Some(PollerCommand::RefreshNow),
        },
    }
}

/// Filter `tokens` by `search` and order them by `field` in `direction`.
///
/// Ties keep their input order in both directions.
pub fn derive_view<'a>(
    tokens: &'a [EnrichedToken],
    search: &str,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a EnrichedToken> {
    let needle = search.to_lowercase();

    let mut view = tokens
        .iter()
        .filter(|token| token.matches(&needle))
        .collect::<Vec<_>>();

    view.sort_by(|a, b| direction.apply(field.compare(a, b)));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{RawTokenRecord, normalize, test_utils::raw_token};

    fn token(id: &str, name: &str, symbol: &str, holders: &str, price: &str) -> EnrichedToken {
        normalize(RawTokenRecord {
            holders: holders.to_string(),
            price: price.to_string(),
            ..raw_token(id, name, symbol)
        })
    }

    fn ids(view: &[&EnrichedToken]) -> Vec<String> {
        view.iter().map(|token| token.id().to_string()).collect()
    }

    #[test]
    fn test_derive_view() {
        struct TestCase {
            search: &'static str,
            field: SortField,
            direction: SortDirection,
            expected: Vec<&'static str>,
        }

        let tokens = vec![
            token("A", "Alpha", "ALP", "100", "0.50"),
            token("B", "Beta", "BET", "200", "1.20"),
            token("C", "BTCWrap", "BTCW", "100", "0.10"),
            token("D", "Ether", "ETH", "50", "abc"),
        ];

        let tests = vec![
            TestCase {
                // TC0: holders descending, ties keep input order
                search: "",
                field: SortField::Holders,
                direction: SortDirection::Descending,
                expected: vec!["B", "A", "C", "D"],
            },
            TestCase {
                // TC1: holders ascending, ties keep input order
                search: "",
                field: SortField::Holders,
                direction: SortDirection::Ascending,
                expected: vec!["D", "A", "C", "B"],
            },
            TestCase {
                // TC2: search matches symbol case-insensitively
                search: "btc",
                field: SortField::MarketCap,
                direction: SortDirection::Descending,
                expected: vec!["C"],
            },
            TestCase {
                // TC3: search matches name
                search: "ETHER",
                field: SortField::Price,
                direction: SortDirection::Descending,
                expected: vec!["D"],
            },
            TestCase {
                // TC4: name sorts as text, malformed price sorts as zero
                search: "",
                field: SortField::Name,
                direction: SortDirection::Ascending,
                expected: vec!["A", "C", "B", "D"],
            },
            TestCase {
                // TC5: malformed price sorts last when descending
                search: "",
                field: SortField::Price,
                direction: SortDirection::Descending,
                expected: vec!["B", "A", "C", "D"],
            },
            TestCase {
                // TC6: no matches
                search: "doge",
                field: SortField::Price,
                direction: SortDirection::Descending,
                expected: vec![],
            },
            TestCase {
                // TC7: whitespace is matched literally, not treated as empty
                search: " ",
                field: SortField::Price,
                direction: SortDirection::Descending,
                expected: vec![],
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = derive_view(&tokens, test.search, test.field, test.direction);
            assert_eq!(ids(&actual), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_holders_scenario_click_twice() {
        let tokens = vec![
            token("A", "Alpha", "ALP", "100", "0.50"),
            token("B", "Beta", "BET", "200", "1.20"),
        ];

        let state = reduce(&ViewState::default(), ViewIntent::SortBy(SortField::Holders)).state;
        let view = derive_view(&tokens, &state.search, state.sort_field, state.sort_direction);
        assert_eq!(ids(&view), vec!["B", "A"]);

        let state = reduce(&state, ViewIntent::SortBy(SortField::Holders)).state;
        assert_eq!(state.sort_direction, SortDirection::Ascending);
        let view = derive_view(&tokens, &state.search, state.sort_field, state.sort_direction);
        assert_eq!(ids(&view), vec!["A", "B"]);
    }

    #[test]
    fn test_sort_direction_twice_restores_order() {
        let tokens = vec![
            token("A", "Alpha", "ALP", "100", "0.50"),
            token("B", "Beta", "BET", "200", "1.20"),
            token("C", "Gamma", "GAM", "100", "0.10"),
        ];
        let initial = ViewState {
            sort_field: SortField::Holders,
            ..ViewState::default()
        };
        let before = derive_view(&tokens, "", initial.sort_field, initial.sort_direction);

        let once = reduce(&initial, ViewIntent::SortBy(SortField::Holders)).state;
        let twice = reduce(&once, ViewIntent::SortBy(SortField::Holders)).state;
        let after = derive_view(&tokens, "", twice.sort_field, twice.sort_direction);

        assert_eq!(twice, initial);
        assert_eq!(ids(&after), ids(&before));
    }

    #[test]
    fn test_liquidity_parsed_at_comparison() {
        let tokens = vec![
            normalize(RawTokenRecord {
                liquidity: "500".to_string(),
                ..raw_token("A", "Alpha", "ALP")
            }),
            normalize(RawTokenRecord {
                liquidity: "n/a".to_string(),
                ..raw_token("B", "Beta", "BET")
            }),
            normalize(RawTokenRecord {
                liquidity: "1500.5".to_string(),
                ..raw_token("C", "Gamma", "GAM")
            }),
        ];

        let view = derive_view(&tokens, "", SortField::Liquidity, SortDirection::Descending);
        assert_eq!(ids(&view), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_reduce() {
        struct TestCase {
            state: ViewState,
            intent: ViewIntent,
            expected: Transition,
        }

        let tests = vec![
            TestCase {
                // TC0: new sort field resets to descending
                state: ViewState {
                    sort_direction: SortDirection::Ascending,
                    ..ViewState::default()
                },
                intent: ViewIntent::SortBy(SortField::Price),
                expected: Transition::state(ViewState {
                    sort_field: SortField::Price,
                    sort_direction: SortDirection::Descending,
                    ..ViewState::default()
                }),
            },
            TestCase {
                // TC1: same sort field flips direction
                state: ViewState::default(),
                intent: ViewIntent::SortBy(SortField::MarketCap),
                expected: Transition::state(ViewState {
                    sort_direction: SortDirection::Ascending,
                    ..ViewState::default()
                }),
            },
            TestCase {
                // TC2: toggle hides a visible column
                state: ViewState::default(),
                intent: ViewIntent::ToggleColumn(Column::PriceTrend),
                expected: Transition::state(ViewState {
                    visible_columns: [
                        Column::Price,
                        Column::Holders,
                        Column::HoldersTrend,
                        Column::Change24h,
                        Column::MarketCap,
                    ]
                    .into_iter()
                    .collect(),
                    ..ViewState::default()
                }),
            },
            TestCase {
                // TC3: toggle shows a hidden column
                state: ViewState::default(),
                intent: ViewIntent::ToggleColumn(Column::Liquidity),
                expected: Transition::state(ViewState {
                    visible_columns: Column::DEFAULT_VISIBLE
                        .into_iter()
                        .chain([Column::Liquidity])
                        .collect(),
                    ..ViewState::default()
                }),
            },
            TestCase {
                // TC4: interval change reschedules the poller
                state: ViewState::default(),
                intent: ViewIntent::SetRefreshInterval(Duration::from_secs(60)),
                expected: Transition {
                    state: ViewState::default().with_refresh_interval(Duration::from_secs(60)),
                    command: Some(PollerCommand::Reschedule(Duration::from_secs(60))),
                },
            },
            TestCase {
                // TC5: manual refresh leaves state untouched
                state: ViewState::default(),
                intent: ViewIntent::Refresh,
                expected: Transition {
                    state: ViewState::default(),
                    command: Some(PollerCommand::RefreshNow),
                },
            },
            TestCase {
                // TC6: search replaces text
                state: ViewState {
                    search: "eth".to_string(),
                    ..ViewState::default()
                },
                intent: ViewIntent::Search("btc".to_string()),
                expected: Transition::state(ViewState {
                    search: "btc".to_string(),
                    ..ViewState::default()
                }),
            },
            TestCase {
                // TC7: select then clear
                state: ViewState {
                    selected: Some(TokenId::new("A")),
                    ..ViewState::default()
                },
                intent: ViewIntent::ClearSelection,
                expected: Transition::state(ViewState::default()),
            },
            TestCase {
                // TC8: select
                state: ViewState::default(),
                intent: ViewIntent::Select(TokenId::new("B")),
                expected: Transition::state(ViewState {
                    selected: Some(TokenId::new("B")),
                    ..ViewState::default()
                }),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = reduce(&test.state, test.intent);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_toggle_column_twice_restores_visibility() {
        let initial = ViewState::default();
        let once = reduce(&initial, ViewIntent::ToggleColumn(Column::Volume24h)).state;
        assert!(once.is_visible(Column::Volume24h));
        let twice = reduce(&once, ViewIntent::ToggleColumn(Column::Volume24h)).state;
        assert_eq!(twice, initial);
    }

    #[test]
    fn test_columns_in_display_order() {
        let state = ViewState::default();
        assert_eq!(
            state.columns().collect::<Vec<_>>(),
            Column::DEFAULT_VISIBLE.to_vec()
        );
    }
}
