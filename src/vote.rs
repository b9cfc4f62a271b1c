//! majority voting over a set of neighbors
use std::collections::HashMap;

use crate::classify::Neighbor;

/// the number of neighbors found for a single label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group<'a> {
    pub label: &'a str,
    pub count: u32,
}

impl Group<'_> {
    /// the fraction of the neighbors that belong to this group
    pub fn fraction(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }
}

/// counts how many neighbors belong to each label. groups are listed in the
/// order their first neighbor appears.
pub fn tally<'a>(neighbors: &[Neighbor<'a>]) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut lookup: HashMap<&'a str, usize> = HashMap::with_capacity(neighbors.len());

    for neighbor in neighbors {
        match lookup.get(neighbor.label) {
            Some(index) => groups[*index].count += 1,
            None => {
                lookup.insert(neighbor.label, groups.len());
                groups.push(Group {
                    label: neighbor.label,
                    count: 1,
                });
            }
        }
    }

    groups
}

/// picks the label with the most neighbors
///
/// neighbors are expected in ascending distance order. when labels tie for
/// the highest count, the label whose closest neighbor comes first wins.
pub fn majority<'a>(neighbors: &[Neighbor<'a>]) -> Option<&'a str> {
    let mut best: Option<Group<'a>> = None;

    for group in tally(neighbors) {
        match best {
            Some(current) if current.count >= group.count => {}
            _ => best = Some(group),
        }
    }

    best.map(|group| group.label)
}

#[cfg(test)]
mod test {
    use super::*;

    fn neighbors<'a>(given: &[(&'a str, f64)]) -> Vec<Neighbor<'a>> {
        given
            .iter()
            .map(|(label, distance)| Neighbor {
                label: *label,
                distance: *distance,
            })
            .collect()
    }

    #[test]
    fn tally_counts_in_first_seen_order() {
        let given = neighbors(&[("b", 0.1), ("a", 0.2), ("b", 0.3), ("c", 0.4)]);

        assert_eq!(
            tally(&given),
            vec![
                Group { label: "b", count: 2 },
                Group { label: "a", count: 1 },
                Group { label: "c", count: 1 },
            ]
        );
    }

    #[test]
    fn majority_picks_most_frequent() {
        let given = neighbors(&[("a", 0.1), ("b", 0.2), ("b", 0.3)]);

        assert_eq!(majority(&given), Some("b"));
    }

    #[test]
    fn tie_goes_to_closest_neighbor() {
        let given = neighbors(&[("b", 0.1), ("a", 0.2), ("a", 0.3), ("b", 0.4)]);

        assert_eq!(majority(&given), Some("b"));

        let given = neighbors(&[("z", 1.0), ("a", 1.0)]);

        assert_eq!(majority(&given), Some("z"));
    }

    #[test]
    fn empty_has_no_majority() {
        assert_eq!(majority(&[]), None);
    }

    #[test]
    fn group_fraction() {
        let group = Group { label: "a", count: 2 };

        assert_eq!(group.fraction(4), 0.5);
        assert_eq!(group.fraction(0), 0.0);
    }
}
