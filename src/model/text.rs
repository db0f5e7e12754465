//! Structural checks on a LightGBM text model before it is handed to the booster.
//!
//! Nothing here evaluates trees. The scan reads the header, checks that every tree's child
//! links point forward (LightGBM walks `while node >= 0`, so a back-edge never terminates) and
//! can cut the model down to its first `num_iteration` boosting rounds.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::{ModelError, ModelResult};

const TREE_PREFIX: &str = "Tree=";
const END_OF_TREES: &str = "end of trees";

/// Byte span of one `Tree=` block.
#[derive(Debug, Clone, Copy)]
struct TreeBlock {
    start: usize,
    line: usize,
}

/// A validated LightGBM text model.
#[derive(Debug)]
pub struct ModelText<'a> {
    text: &'a str,
    num_features: usize,
    num_tree_per_iteration: usize,
    feature_names: Vec<String>,
    trees: Vec<TreeBlock>,
    /// Offset of `end of trees`, or the end of the text.
    trees_end: usize,
}

impl<'a> ModelText<'a> {
    pub fn parse(text: &'a str) -> ModelResult<Self> {
        let mut header: HashMap<&str, &str> = HashMap::new();
        let mut trees: Vec<TreeBlock> = Vec::new();
        let mut tree_fields: Vec<HashMap<&str, (usize, &str)>> = Vec::new();
        let mut trees_end = text.len();

        let mut offset = 0;
        for (idx, raw_line) in text.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;
            let start = offset;
            offset += raw_line.len();

            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line == END_OF_TREES {
                trees_end = start;
                break;
            }
            if line.starts_with(TREE_PREFIX) {
                trees.push(TreeBlock {
                    start,
                    line: line_no,
                });
                tree_fields.push(HashMap::new());
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                match tree_fields.last_mut() {
                    Some(fields) => {
                        fields.insert(key, (line_no, value));
                    }
                    None => {
                        header.insert(key, value);
                    }
                }
            }
        }

        let num_class: usize = header_value(&header, "num_class")?.unwrap_or(1);
        if num_class != 1 {
            return Err(ModelError::Unsupported(format!(
                "num_class={num_class}; only single-output models are served"
            )));
        }

        let max_feature_idx: i64 =
            header_value(&header, "max_feature_idx")?.ok_or_else(|| ModelError::Parse {
                line: 0,
                reason: "missing 'max_feature_idx' header".to_string(),
            })?;
        let num_features = usize::try_from(max_feature_idx + 1).map_err(|_| ModelError::Parse {
            line: 0,
            reason: format!("invalid max_feature_idx {max_feature_idx}"),
        })?;

        let num_tree_per_iteration: usize =
            header_value(&header, "num_tree_per_iteration")?.unwrap_or(1);
        let feature_names = header
            .get("feature_names")
            .map(|names| names.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        if trees.is_empty() {
            return Err(ModelError::Parse {
                line: 0,
                reason: "model contains no trees".to_string(),
            });
        }
        for (block, fields) in trees.iter().zip(&tree_fields) {
            check_links(block.line, fields)?;
        }

        Ok(Self {
            text,
            num_features,
            num_tree_per_iteration: num_tree_per_iteration.max(1),
            feature_names,
            trees,
            trees_end,
        })
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Trees kept when predicting with `num_iteration` rounds (`None` = all).
    pub fn trees_for(&self, num_iteration: Option<usize>) -> usize {
        num_iteration
            .map(|n| n.saturating_mul(self.num_tree_per_iteration))
            .unwrap_or(self.trees.len())
            .min(self.trees.len())
    }

    /// Model text limited to the first `num_iteration` rounds.
    ///
    /// `tree_sizes=` is dropped from the header because it no longer matches; LightGBM then
    /// locates trees by their `Tree=` markers.
    pub fn truncated(&self, num_iteration: Option<usize>) -> String {
        let keep = self.trees_for(num_iteration);
        if keep == self.trees.len() {
            return self.text.to_string();
        }

        let first_tree = self.trees[0].start;
        let cut = self.trees[keep].start;

        let mut out = String::with_capacity(self.text.len());
        for line in self.text[..first_tree].split_inclusive('\n') {
            if !line.trim_start().starts_with("tree_sizes=") {
                out.push_str(line);
            }
        }
        out.push_str(&self.text[first_tree..cut]);
        out.push_str(&self.text[self.trees_end..]);
        out
    }
}

/// Child `c >= 0` is an internal node and must come after its parent; `c < 0` is leaf `!c`.
fn check_links(tree_line: usize, fields: &HashMap<&str, (usize, &str)>) -> ModelResult<()> {
    let num_leaves: usize = match fields.get("num_leaves") {
        Some(&(line, value)) => parse_scalar(line, value)?,
        None => {
            return Err(ModelError::Parse {
                line: tree_line,
                reason: "tree is missing 'num_leaves'".to_string(),
            });
        }
    };
    if num_leaves <= 1 {
        return Ok(());
    }

    let internal = num_leaves - 1;
    for key in ["left_child", "right_child"] {
        let (line, children) = parse_field::<i64>(fields, key)?;
        if children.len() != internal {
            return Err(ModelError::Parse {
                line,
                reason: format!("{key} has {} entries, expected {internal}", children.len()),
            });
        }
        for (node, &child) in children.iter().enumerate() {
            let valid = if child >= 0 {
                child as usize > node && (child as usize) < internal
            } else {
                ((!child) as usize) < num_leaves
            };
            if !valid {
                return Err(ModelError::Parse {
                    line,
                    reason: format!("{key} of node {node} points to invalid node {child}"),
                });
            }
        }
    }
    Ok(())
}

fn header_value<T: FromStr>(header: &HashMap<&str, &str>, key: &str) -> ModelResult<Option<T>> {
    header
        .get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ModelError::Parse {
                line: 0,
                reason: format!("invalid header {key}={value}"),
            })
        })
        .transpose()
}

fn parse_scalar<T: FromStr>(line: usize, value: &str) -> ModelResult<T> {
    value.trim().parse().map_err(|_| ModelError::Parse {
        line,
        reason: format!("invalid value '{}'", value.trim()),
    })
}

fn parse_field<T: FromStr>(
    fields: &HashMap<&str, (usize, &str)>,
    key: &str,
) -> ModelResult<(usize, Vec<T>)> {
    let Some(&(line, value)) = fields.get(key) else {
        return Ok((0, Vec::new()));
    };
    let values = value
        .split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| ModelError::Parse {
                line,
                reason: format!("invalid {key} entry '{token}'"),
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;
    Ok((line, values))
}
