//! Page layout resolution
//!
//! This module turns the per-page layout flags into display groups. Two
//! independent rules live here and they are deliberately not unified:
//!
//! - [resolve_spread_pairs] groups pages for the interactive preview. Pairing
//!   depends on the flags of neighbouring pages.
//! - [spread_role] decides the `page-spread-left` / `page-spread-right` property
//!   written into the exported package. It depends only on the parity of the
//!   page's original index and the reading direction.
//!
//! The two can disagree when non-spread pages interrupt a run of spread pages;
//! downstream consumers may rely on either behavior.

use log::warn;

use crate::types::{PageLayout, PageType, ReadingDirection, SpreadKind, SpreadPair, SpreadRole};

/// Groups content pages into preview spreads
///
/// A page stands alone when it is a cover or toc page, or when its `spread` flag
/// is off. A spread-eligible page is paired with the next page if that page is
/// spread-eligible too; the pair is ordered `[i + 1, i]` for right-to-left books
/// and `[i, i + 1]` otherwise. An eligible page without a partner becomes a
/// `SpreadSingle` group.
///
/// The result covers every index of `layouts` exactly once, in ascending order
/// of first appearance.
pub fn resolve_spread_pairs(layouts: &[PageLayout], direction: ReadingDirection) -> Vec<SpreadPair> {
    let mut pairs = Vec::with_capacity(layouts.len());
    let mut index = 0;

    while index < layouts.len() {
        if !is_spread_eligible(&layouts[index]) {
            pairs.push(SpreadPair {
                kind: SpreadKind::Single,
                pages: vec![index],
            });
            index += 1;
            continue;
        }

        match layouts.get(index + 1) {
            Some(next) if is_spread_eligible(next) => {
                let pages = match direction {
                    ReadingDirection::Rtl => vec![index + 1, index],
                    ReadingDirection::Ltr => vec![index, index + 1],
                };

                pairs.push(SpreadPair {
                    kind: SpreadKind::Spread,
                    pages,
                });
                index += 2;
            }

            _ => {
                pairs.push(SpreadPair {
                    kind: SpreadKind::SpreadSingle,
                    pages: vec![index],
                });
                index += 1;
            }
        }
    }

    pairs
}

/// Decides the left/right role of a spread page in the exported package
///
/// Left pages are the odd indices of right-to-left books and the even indices
/// of left-to-right books. Neighbouring pages are not consulted, so a page
/// without a partner still gets a role.
pub fn spread_role(original_index: usize, direction: ReadingDirection) -> SpreadRole {
    let is_left = match direction {
        ReadingDirection::Rtl => original_index % 2 == 1,
        ReadingDirection::Ltr => original_index % 2 == 0,
    };

    if is_left {
        SpreadRole::Left
    } else {
        SpreadRole::Right
    }
}

/// Creates the layouts assigned to freshly ingested images
///
/// The first page is a cover, all others are content; spreads are off.
pub fn default_page_layouts(count: usize, direction: ReadingDirection) -> Vec<PageLayout> {
    (0..count)
        .map(|index| PageLayout {
            page_type: if index == 0 {
                PageType::Cover
            } else {
                PageType::Content
            },
            spread: false,
            reading_direction: direction,
        })
        .collect()
}

/// Bulk layout presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPreset {
    /// Spreads everywhere except the first and the last page
    Manga,

    /// No spreads at all
    SinglePage,

    /// Spreads on every odd index
    AlternateSpread,
}

/// Applies a preset, returning a new layout array
///
/// Only the `spread` flag changes; page types and directions are kept.
pub fn apply_preset(layouts: &[PageLayout], preset: LayoutPreset) -> Vec<PageLayout> {
    let last = layouts.len().saturating_sub(1);

    layouts
        .iter()
        .enumerate()
        .map(|(index, layout)| {
            let spread = match preset {
                LayoutPreset::Manga => index > 0 && index < last,
                LayoutPreset::SinglePage => false,
                LayoutPreset::AlternateSpread => index > 0 && index % 2 == 1,
            };

            PageLayout { spread, ..*layout }
        })
        .collect()
}

/// Returns the layout of a content image, or the default layout when missing
pub(crate) fn layout_at(layouts: &[PageLayout], index: usize) -> PageLayout {
    match layouts.get(index) {
        Some(layout) => *layout,
        None => {
            warn!("No page layout for image {}, using the default layout", index);
            PageLayout::default()
        }
    }
}

fn is_spread_eligible(layout: &PageLayout) -> bool {
    layout.spread && layout.page_type == PageType::Content
}

#[cfg(test)]
mod tests {
    mod resolver_tests {
        use proptest::prelude::*;

        use crate::{
            layout::resolve_spread_pairs,
            types::{PageLayout, PageType, ReadingDirection, SpreadKind, SpreadPair},
        };

        fn layouts(flags: &[bool]) -> Vec<PageLayout> {
            flags.iter().map(|&spread| PageLayout::new(spread)).collect()
        }

        fn pair(kind: SpreadKind, pages: &[usize]) -> SpreadPair {
            SpreadPair {
                kind,
                pages: pages.to_vec(),
            }
        }

        #[test]
        fn test_all_single() {
            let pairs = resolve_spread_pairs(&layouts(&[false, false, false]), ReadingDirection::Ltr);

            assert_eq!(
                pairs,
                vec![
                    pair(SpreadKind::Single, &[0]),
                    pair(SpreadKind::Single, &[1]),
                    pair(SpreadKind::Single, &[2]),
                ]
            );
            assert!(pairs.iter().all(|pair| !pair.is_spread()));
        }

        #[test]
        fn test_rtl_pair_is_reversed() {
            let pairs = resolve_spread_pairs(
                &layouts(&[false, true, true, false]),
                ReadingDirection::Rtl,
            );

            assert_eq!(
                pairs,
                vec![
                    pair(SpreadKind::Single, &[0]),
                    pair(SpreadKind::Spread, &[2, 1]),
                    pair(SpreadKind::Single, &[3]),
                ]
            );
        }

        #[test]
        fn test_ltr_pair_keeps_order() {
            let pairs = resolve_spread_pairs(&layouts(&[true, true]), ReadingDirection::Ltr);
            assert_eq!(pairs, vec![pair(SpreadKind::Spread, &[0, 1])]);
        }

        #[test]
        fn test_unpartnered_spread_page() {
            let pairs = resolve_spread_pairs(
                &layouts(&[true, true, true, false, true]),
                ReadingDirection::Ltr,
            );

            assert_eq!(
                pairs,
                vec![
                    pair(SpreadKind::Spread, &[0, 1]),
                    pair(SpreadKind::SpreadSingle, &[2]),
                    pair(SpreadKind::Single, &[3]),
                    pair(SpreadKind::SpreadSingle, &[4]),
                ]
            );
            assert!(pairs[1].is_spread());
        }

        #[test]
        fn test_cover_and_toc_pages_stand_alone() {
            let layouts = vec![
                PageLayout::new(true).with_type(PageType::Cover),
                PageLayout::new(true),
                PageLayout::new(true).with_type(PageType::Toc),
                PageLayout::new(true),
            ];
            let pairs = resolve_spread_pairs(&layouts, ReadingDirection::Rtl);

            assert_eq!(
                pairs,
                vec![
                    pair(SpreadKind::Single, &[0]),
                    pair(SpreadKind::SpreadSingle, &[1]),
                    pair(SpreadKind::Single, &[2]),
                    pair(SpreadKind::SpreadSingle, &[3]),
                ]
            );
        }

        #[test]
        fn test_empty_layouts() {
            assert!(resolve_spread_pairs(&[], ReadingDirection::Rtl).is_empty());
        }

        fn direction() -> impl Strategy<Value = ReadingDirection> {
            prop_oneof![Just(ReadingDirection::Ltr), Just(ReadingDirection::Rtl)]
        }

        fn page_type() -> impl Strategy<Value = PageType> {
            prop_oneof![
                Just(PageType::Cover),
                Just(PageType::Toc),
                Just(PageType::Content),
                Just(PageType::Content),
            ]
        }

        proptest! {
            #[test]
            fn test_groups_cover_every_page_once(
                pages in prop::collection::vec((any::<bool>(), page_type()), 0..64),
                direction in direction(),
            ) {
                let layouts: Vec<PageLayout> = pages
                    .iter()
                    .map(|&(spread, page_type)| PageLayout::new(spread).with_type(page_type))
                    .collect();
                let pairs = resolve_spread_pairs(&layouts, direction);

                let mut covered: Vec<usize> = pairs.iter().flat_map(|pair| pair.pages.clone()).collect();
                covered.sort_unstable();
                prop_assert_eq!(covered, (0..layouts.len()).collect::<Vec<_>>());

                let mut previous_min = None;
                for pair in &pairs {
                    prop_assert!(!pair.pages.is_empty() && pair.pages.len() <= 2);
                    prop_assert_eq!(pair.pages.len() == 2, pair.kind == SpreadKind::Spread);

                    let min = *pair.pages.iter().min().unwrap();
                    prop_assert!(previous_min.is_none_or(|previous| previous < min));
                    previous_min = Some(min);
                }
            }
        }
    }

    mod spread_role_tests {
        use proptest::prelude::*;

        use crate::{
            layout::{resolve_spread_pairs, spread_role},
            types::{PageLayout, ReadingDirection, SpreadKind, SpreadRole},
        };

        #[test]
        fn test_rtl_parity() {
            assert_eq!(spread_role(0, ReadingDirection::Rtl), SpreadRole::Right);
            assert_eq!(spread_role(1, ReadingDirection::Rtl), SpreadRole::Left);
            assert_eq!(spread_role(2, ReadingDirection::Rtl), SpreadRole::Right);
        }

        #[test]
        fn test_ltr_parity() {
            assert_eq!(spread_role(0, ReadingDirection::Ltr), SpreadRole::Left);
            assert_eq!(spread_role(1, ReadingDirection::Ltr), SpreadRole::Right);
            assert_eq!(spread_role(2, ReadingDirection::Ltr), SpreadRole::Left);
        }

        /// The preview pairing and the exported roles follow separate rules.
        #[test]
        fn test_roles_diverge_from_preview_pairing() {
            // Page 1 interrupts the run, so the preview pairs 2 with 3 and
            // leaves 0 and 4 without partners.
            let layouts: Vec<PageLayout> = [true, false, true, true, true]
                .iter()
                .map(|&spread| PageLayout::new(spread))
                .collect();
            let pairs = resolve_spread_pairs(&layouts, ReadingDirection::Ltr);

            assert_eq!(pairs[0].kind, SpreadKind::SpreadSingle);
            assert_eq!(pairs[2].pages, vec![2, 3]);
            assert_eq!(pairs[3].kind, SpreadKind::SpreadSingle);

            // The lone spread page at index 0 still receives a role.
            assert_eq!(spread_role(0, ReadingDirection::Ltr), SpreadRole::Left);
            // Index 4 has no partner in the preview, yet it is a left page.
            assert_eq!(spread_role(4, ReadingDirection::Ltr), SpreadRole::Left);
        }

        proptest! {
            #[test]
            fn test_roles_alternate_with_parity(index in 0usize..10_000) {
                for direction in [ReadingDirection::Ltr, ReadingDirection::Rtl] {
                    prop_assert_ne!(spread_role(index, direction), spread_role(index + 1, direction));
                    prop_assert_eq!(spread_role(index, direction), spread_role(index + 2, direction));
                }
            }
        }
    }

    mod preset_tests {
        use crate::{
            layout::{LayoutPreset, apply_preset, default_page_layouts, layout_at},
            types::{PageLayout, PageType, ReadingDirection},
        };

        fn flags(layouts: &[PageLayout]) -> Vec<bool> {
            layouts.iter().map(|layout| layout.spread).collect()
        }

        #[test]
        fn test_default_page_layouts() {
            let layouts = default_page_layouts(3, ReadingDirection::Ltr);

            assert_eq!(layouts.len(), 3);
            assert_eq!(layouts[0].page_type, PageType::Cover);
            assert_eq!(layouts[1].page_type, PageType::Content);
            assert!(layouts.iter().all(|layout| !layout.spread));
            assert!(
                layouts
                    .iter()
                    .all(|layout| layout.reading_direction == ReadingDirection::Ltr)
            );
        }

        #[test]
        fn test_manga_preset() {
            let layouts = default_page_layouts(5, ReadingDirection::Rtl);
            let result = apply_preset(&layouts, LayoutPreset::Manga);

            assert_eq!(flags(&result), vec![false, true, true, true, false]);
            assert_eq!(result[0].page_type, PageType::Cover);
        }

        #[test]
        fn test_alternate_preset() {
            let layouts = default_page_layouts(5, ReadingDirection::Rtl);
            let result = apply_preset(&layouts, LayoutPreset::AlternateSpread);

            assert_eq!(flags(&result), vec![false, true, false, true, false]);
        }

        #[test]
        fn test_single_page_preset() {
            let layouts = apply_preset(
                &default_page_layouts(4, ReadingDirection::Rtl),
                LayoutPreset::Manga,
            );
            let result = apply_preset(&layouts, LayoutPreset::SinglePage);

            assert_eq!(flags(&result), vec![false; 4]);
        }

        #[test]
        fn test_preset_on_empty_layouts() {
            assert!(apply_preset(&[], LayoutPreset::Manga).is_empty());
        }

        #[test]
        fn test_layout_at_falls_back() {
            let layouts = vec![PageLayout::new(true)];

            assert!(layout_at(&layouts, 0).spread);
            assert_eq!(layout_at(&layouts, 5), PageLayout::default());
        }
    }
}
