//! Assembly of the flat category list into a forest.

use std::collections::HashMap;

use crate::category::{Category, CategoryNode};
use crate::types::DbId;

/// Build the category forest from a flat list.
///
/// Sibling order (and root order) follows the order of `categories`, so the
/// caller passes them sorted by name. A category whose parent is missing from
/// the list is promoted to a root instead of being dropped. Runs in linear
/// time without recursion, so deep chains cannot exhaust the stack.
pub fn build_forest(categories: Vec<Category>) -> Vec<CategoryNode> {
    let count = categories.len();
    let index: HashMap<DbId, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    // First pass: link every category to its parent's slot.
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for (i, category) in categories.iter().enumerate() {
        match category.parent_id {
            None => roots.push(i),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&p) if p != i => children[p].push(i),
                _ => {
                    tracing::warn!(
                        category_id = category.id,
                        parent_id,
                        "Category references a missing parent, treating as root"
                    );
                    roots.push(i);
                }
            },
        }
    }

    // Second pass: pre-order walk from the roots. Anything not reached sits on
    // a parent cycle and is promoted so no record disappears from the output.
    let mut visited = vec![false; count];
    let mut order = Vec::with_capacity(count);
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut forest_roots = Vec::new();

    for root in roots {
        forest_roots.push(root);
        walk(root, &children, &mut visited, &mut order, &mut tree_children);
    }
    for i in 0..count {
        if !visited[i] {
            tracing::warn!(
                category_id = categories[i].id,
                "Category is part of a parent cycle, treating as root"
            );
            forest_roots.push(i);
            walk(i, &children, &mut visited, &mut order, &mut tree_children);
        }
    }
    forest_roots.sort_unstable();

    // Children always follow their parent in `order`, so building in reverse
    // guarantees every child node exists before its parent needs it.
    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    let mut built: Vec<Option<CategoryNode>> = (0..count).map(|_| None).collect();
    for &i in order.iter().rev() {
        let Some(category) = slots[i].take() else {
            continue;
        };
        let nodes = tree_children[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[i] = Some(CategoryNode {
            id: category.id,
            name: category.name,
            status: category.status,
            children: nodes,
        });
    }

    forest_roots
        .into_iter()
        .filter_map(|r| built[r].take())
        .collect()
}

fn walk(
    start: usize,
    children: &[Vec<usize>],
    visited: &mut [bool],
    order: &mut Vec<usize>,
    tree_children: &mut [Vec<usize>],
) {
    visited[start] = true;
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        order.push(i);
        for &c in &children[i] {
            if !visited[c] {
                visited[c] = true;
                tree_children[i].push(c);
                stack.push(c);
            }
        }
    }
}
