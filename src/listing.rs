use rand::Rng;

use crate::types::MediaItem;

/// Uniformly shuffled copy of `items` (Fisher-Yates). The input is untouched.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::rng())
}

pub fn shuffle_with<T: Clone, R: Rng>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}

/// Case-insensitive substring search over caption, overview and tag tokens.
/// An empty or absent query keeps everything; relative order is preserved.
pub fn filter(items: &[MediaItem], query: Option<&str>) -> Vec<MediaItem> {
    let needle = match query {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return items.to_vec(),
    };
    items.iter().filter(|item| matches(item, &needle)).cloned().collect()
}

fn matches(item: &MediaItem, needle: &str) -> bool {
    let caption = item.caption.as_deref().unwrap_or("");
    let overview = item.overview.as_deref().unwrap_or("");
    caption.to_lowercase().contains(needle)
        || overview.to_lowercase().contains(needle)
        || item.tags().iter().any(|t| t.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(id: &str, caption: Option<&str>, overview: Option<&str>, tag: Option<&str>) -> MediaItem {
        let mut m = MediaItem::new(id);
        m.caption = caption.map(str::to_string);
        m.overview = overview.map(str::to_string);
        m.tag = tag.map(str::to_string);
        m
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> { v.sort_unstable(); v }

    #[test]
    fn shuffle_is_a_permutation() {
        let input: Vec<u32> = (0..50).chain([7, 7, 7]).collect();
        let before = input.clone();
        for _ in 0..20 {
            let out = shuffle(&input);
            assert_eq!(out.len(), input.len());
            assert_eq!(sorted(out), sorted(input.clone()));
        }
        assert_eq!(input, before);
    }

    #[test]
    fn short_inputs_come_back_unchanged() {
        assert_eq!(shuffle::<u32>(&[]), Vec::<u32>::new());
        assert_eq!(shuffle(&[42]), vec![42]);
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let input: Vec<u32> = (0..10).collect();
        let a = shuffle_with(&input, &mut StdRng::seed_from_u64(9));
        let b = shuffle_with(&input, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn every_position_is_reachable() {
        // three elements: all six orderings should show up over enough draws
        let input = [1u32, 2, 3];
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(shuffle_with(&input, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn filter_empty_list() {
        assert!(filter(&[], Some("x")).is_empty());
    }

    #[test]
    fn empty_query_is_identity() {
        let items = vec![item("a", None, None, None), item("b", Some("B"), None, None)];
        assert_eq!(filter(&items, Some("")), items);
        assert_eq!(filter(&items, None), items);
    }

    #[test]
    fn case_insensitive_caption_match() {
        let items = vec![item("a", Some("Climate News"), None, None), item("b", Some("Sports"), None, None)];
        let out = filter(&items, Some("climate"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
        assert_eq!(filter(&items, Some("CLIMATE"))[0].id, "a");
    }

    #[test]
    fn matches_overview_and_tag_tokens() {
        let items = vec![
            item("a", None, Some("Attack News on Israel"), None),
            item("b", None, None, Some("#tech #news")),
            item("c", Some("Other"), Some("nothing"), Some("#world")),
        ];
        assert_eq!(filter(&items, Some("israel"))[0].id, "a");
        assert_eq!(filter(&items, Some("#TECH"))[0].id, "b");
        let news: Vec<_> = filter(&items, Some("news")).into_iter().map(|m| m.id).collect();
        assert_eq!(news, vec!["a", "b"]);
    }

    #[test]
    fn missing_fields_do_not_exclude_other_matches() {
        let items = vec![item("a", None, None, Some("#breaking")), item("b", None, None, None)];
        let out = filter(&items, Some("break"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn query_spanning_two_tags_does_not_match() {
        let items = vec![item("a", None, None, Some("#news #climate"))];
        assert!(filter(&items, Some("news #climate")).is_empty());
    }
}
