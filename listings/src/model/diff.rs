//! Line diff between an embedded listing and its source file.

use std::fmt;

use serde::Serialize;

/// How an embedded listing differs from its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum DiffResult {
    /// Byte-identical.
    Match,
    /// Identical once empty and whitespace-only lines are dropped.
    WhitespaceOnly,
    /// Anything else.
    ContentDiffers,
}

impl DiffResult {
    /// Returns a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            DiffResult::Match => "No difference",
            DiffResult::WhitespaceOnly => "Only blank lines added/subtracted",
            DiffResult::ContentDiffers => "Content difference",
        }
    }

    /// Returns the short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            DiffResult::Match => "match",
            DiffResult::WhitespaceOnly => "whitespace-only",
            DiffResult::ContentDiffers => "content-differs",
        }
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side(s) of the comparison a diff line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffTag {
    Common,
    LeftOnly,
    RightOnly,
}

impl DiffTag {
    /// Returns the marker printed in front of a diff line.
    pub fn symbol(&self) -> char {
        match self {
            DiffTag::Common => ' ',
            DiffTag::LeftOnly => '-',
            DiffTag::RightOnly => '+',
        }
    }
}

/// One aligned line of a diff.
///
/// `left` and `right` are 1-based line numbers counted independently on each
/// side; a side's number is absent when the line does not occur on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub tag: DiffTag,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub text: String,
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = |n: Option<usize>| n.map(|n| format!("{:4}", n)).unwrap_or_else(|| "    ".to_string());
        write!(
            f,
            "{} {} {} {}",
            self.tag.symbol(),
            number(self.left),
            number(self.right),
            self.text
        )
    }
}

/// Classification plus the full tagged diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub result: DiffResult,
    pub lines: Vec<DiffLine>,
}

impl Comparison {
    /// Returns the lines that occur on one side only.
    pub fn changes(&self) -> impl Iterator<Item = &DiffLine> {
        self.lines.iter().filter(|l| l.tag != DiffTag::Common)
    }

    /// Returns true for a byte-identical comparison.
    pub fn is_match(&self) -> bool {
        self.result == DiffResult::Match
    }
}

/// Compares embedded listing text (left) against file contents (right).
///
/// Lines keep their endings, so a `\r\n` line never equals a `\n` line.
pub fn compare(left: &str, right: &str) -> Comparison {
    let result = if left == right {
        DiffResult::Match
    } else if significant_lines(left) == significant_lines(right) {
        DiffResult::WhitespaceOnly
    } else {
        DiffResult::ContentDiffers
    };

    let left_lines: Vec<&str> = left.split_inclusive('\n').collect();
    let right_lines: Vec<&str> = right.split_inclusive('\n').collect();

    Comparison {
        result,
        lines: diff_lines(&left_lines, &right_lines),
    }
}

fn significant_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n')
        .filter(|l| !l.trim().is_empty())
        .collect()
}

/// Aligns two line sequences on their longest common subsequence.
///
/// A trailing `\n` is dropped from each line's text.
pub fn diff_lines(left: &[&str], right: &[&str]) -> Vec<DiffLine> {
    let lcs = lcs_table(left, right);

    // Walk back from the end; reversed afterwards so removals precede
    // additions inside a changed region.
    let mut edits: Vec<(DiffTag, &str)> = Vec::with_capacity(left.len() + right.len());
    let mut i = left.len();
    let mut j = right.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && left[i - 1] == right[j - 1] {
            edits.push((DiffTag::Common, left[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            edits.push((DiffTag::RightOnly, right[j - 1]));
            j -= 1;
        } else {
            edits.push((DiffTag::LeftOnly, left[i - 1]));
            i -= 1;
        }
    }

    edits.reverse();

    let mut n_left = 0;
    let mut n_right = 0;
    edits
        .into_iter()
        .map(|(tag, text)| {
            let (l, r) = match tag {
                DiffTag::Common => {
                    n_left += 1;
                    n_right += 1;
                    (Some(n_left), Some(n_right))
                }
                DiffTag::LeftOnly => {
                    n_left += 1;
                    (Some(n_left), None)
                }
                DiffTag::RightOnly => {
                    n_right += 1;
                    (None, Some(n_right))
                }
            };
            DiffLine {
                tag,
                left: l,
                right: r,
                text: text.strip_suffix('\n').unwrap_or(text).to_string(),
            }
        })
        .collect()
}

fn lcs_table(left: &[&str], right: &[&str]) -> Vec<Vec<usize>> {
    let m = left.len();
    let n = right.len();
    let mut table = vec![vec![0usize; n + 1]; m + 1];

    for i in 1..=m {
        for j in 1..=n {
            if left[i - 1] == right[j - 1] {
                table[i][j] = table[i - 1][j - 1] + 1;
            } else {
                table[i][j] = table[i - 1][j].max(table[i][j - 1]);
            }
        }
    }

    table
}
