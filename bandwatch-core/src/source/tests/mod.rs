
use crate::source::LineSource;

pub(super) fn collect(source: &mut impl LineSource) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line) = source.next_line().unwrap() {
        lines.push(String::from_utf8(line).unwrap());
    }
    lines
}

pub(super) fn next_str(source: &mut impl LineSource) -> String {
    String::from_utf8(source.next_line().unwrap().unwrap()).unwrap()
}
