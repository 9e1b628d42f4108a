// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Natural ("file browser") ordering of file names.
//
// Runs of ASCII digits compare by numeric value, so `file2` sorts before
// `file10`. Everything else compares character by character after lowercasing,
// with punctuation ranked before digits and digits before letters, which is
// the order desktop file managers present. Names that differ only in the
// number of leading zeros are ordered by a final tie-break (more zeros first)
// so the comparison stays a total order.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

/// Compare two names in natural order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    let mut zero_padding = Ordering::Equal;

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return zero_padding,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digit_run(&mut left);
                let r_run = take_digit_run(&mut right);
                match compare_numeric(&l_run, &r_run) {
                    Ordering::Equal => {
                        if zero_padding == Ordering::Equal {
                            zero_padding = r_run.len().cmp(&l_run.len());
                        }
                    }
                    decided => return decided,
                }
            }
            (Some(l), Some(r)) => {
                left.next();
                right.next();
                match char_key(l).cmp(&char_key(r)) {
                    Ordering::Equal => {}
                    decided => return decided,
                }
            }
        }
    }
}

/// Compare two paths by their base file names only.
pub fn compare_file_names(a: &Path, b: &Path) -> Ordering {
    compare(&base_name(a), &base_name(b))
}

/// Sort items by the natural order of their base file names.
///
/// Names that compare equal fall back to the full path, so the result does
/// not depend on the input order.
pub fn sort_by_file_name<T, F>(items: &mut [T], path_of: F)
where
    F: Fn(&T) -> &Path,
{
    items.sort_by(|a, b| {
        let (pa, pb) = (path_of(a), path_of(b));
        compare_file_names(pa, pb).then_with(|| pa.cmp(pb))
    });
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn take_digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compare two ASCII digit strings by value without parsing (no overflow).
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort key for a single non-digit-run character.
fn char_key(c: char) -> (u8, char) {
    let rank = if c.is_ascii_digit() {
        1
    } else if c.is_alphanumeric() {
        2
    } else {
        0
    };
    let folded = c.to_lowercase().next().unwrap_or(c);
    (rank, folded)
}
