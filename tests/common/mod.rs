// common/mod.rs - Minimal pattern parser shared by the integration tests
// and the bench.
//
// Turns a small regex dialect into the post-order node sequence the
// automaton builder consumes:
//   literals, `.`, `\w \d \s`, `\b ^ $`, `( )`, `(?: )`, `|`,
//   `* + ?` with an optional lazy `?` suffix, `\` escapes anything else.
//
// Assertion helpers follow the usual shape:
//   x2(pattern, text, from, to)        -> first match at from..to
//   x3(pattern, text, from, to, mem)   -> group mem of the first match at from..to
//   n(pattern, text)                   -> no match

#![allow(dead_code)]

use std::ops::Range;

use nfascan::encodings::Utf8;
use nfascan::exec::{find_all, ScanEnd, ScanFlags, Scratch};
use nfascan::nfa::Nfa;
use nfascan::node::{Atom, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tok {
    Char(char),
    Any,
    Word,
    Digit,
    Space,
    WordBoundary,
    TextStart,
    TextEnd,
}

fn is_word(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric() || c == '_')
}

impl Atom for Tok {
    fn is_match(&self, c: char) -> bool {
        match *self {
            Tok::Char(x) => x == c,
            Tok::Any => c != '\n',
            Tok::Word => is_word(Some(c)),
            Tok::Digit => c.is_ascii_digit(),
            Tok::Space => c.is_whitespace(),
            Tok::WordBoundary | Tok::TextStart | Tok::TextEnd => false,
        }
    }

    fn literal(&self) -> Option<char> {
        match *self {
            Tok::Char(c) => Some(c),
            _ => None,
        }
    }

    fn check(&self, prev: Option<char>, next: Option<char>) -> bool {
        match *self {
            Tok::WordBoundary => is_word(prev) != is_word(next),
            Tok::TextStart => prev.is_none(),
            Tok::TextEnd => next.is_none(),
            _ => true,
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    groups: u16,
    out: Vec<Node<Tok>>,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn alternation(&mut self) {
        self.sequence();
        while self.eat('|') {
            self.sequence();
            self.out.push(Node::alternate());
        }
    }

    fn sequence(&mut self) {
        let mut items = 0;
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            self.repetition();
            items += 1;
            if items > 1 {
                self.out.push(Node::concat());
            }
        }
        if items == 0 {
            self.out.push(Node::empty());
        }
    }

    fn repetition(&mut self) {
        self.primary();
        loop {
            let make: fn(bool) -> Node<Tok> = match self.peek() {
                Some('*') => Node::zero_or_more,
                Some('+') => Node::one_or_more,
                Some('?') => Node::zero_or_one,
                _ => break,
            };
            self.pos += 1;
            let greedy = !self.eat('?');
            self.out.push(make(greedy));
        }
    }

    fn primary(&mut self) {
        let node = match self.bump() {
            Some('(') => {
                if self.peek() == Some('?') && self.chars.get(self.pos + 1) == Some(&':') {
                    self.pos += 2;
                    self.alternation();
                    self.close_paren();
                    self.out.push(Node::bare_group_start());
                    self.out.push(Node::bare_group_end());
                } else {
                    self.groups += 1;
                    let group = self.groups;
                    self.alternation();
                    self.close_paren();
                    self.out.push(Node::group_start(group));
                    self.out.push(Node::group_end(group));
                }
                return;
            }
            Some('.') => Node::atom(Tok::Any),
            Some('^') => Node::assertion(Tok::TextStart),
            Some('$') => Node::assertion(Tok::TextEnd),
            Some('\\') => match self.bump() {
                Some('w') => Node::atom(Tok::Word),
                Some('d') => Node::atom(Tok::Digit),
                Some('s') => Node::atom(Tok::Space),
                Some('b') => Node::assertion(Tok::WordBoundary),
                Some(c) => Node::atom(Tok::Char(c)),
                None => panic!("trailing `\\`"),
            },
            Some(c) => Node::atom(Tok::Char(c)),
            None => panic!("unexpected end of pattern"),
        };
        self.out.push(node);
    }

    fn close_paren(&mut self) {
        assert!(self.eat(')'), "missing `)` at {}", self.pos);
    }
}

/// Post-order nodes for `pattern`.
pub fn parse(pattern: &str) -> Vec<Node<Tok>> {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        groups: 0,
        out: Vec::new(),
    };
    parser.alternation();
    assert_eq!(parser.pos, parser.chars.len(), "unbalanced `)` in {pattern:?}");
    parser.out
}

pub fn compile(pattern: &str) -> Nfa<Tok> {
    Nfa::new(parse(pattern)).unwrap_or_else(|e| panic!("compile failed for {pattern:?}: {e}"))
}

/// Spans of every match, across as many scans as it takes.
pub fn spans(pattern: &str, text: &str) -> Vec<Range<usize>> {
    compile(pattern)
        .find_iter(text)
        .map(|caps| caps.get(0).unwrap().range())
        .collect()
}

/// Spans buffered by one scan from offset 0, and how the scan ended.
pub fn scan_once(nfa: &Nfa<Tok>, text: &str) -> (Vec<Range<usize>>, Option<ScanEnd>) {
    let mut scratch = Scratch::new();
    let end = find_all(nfa, &Utf8, text.as_bytes(), 0, &mut scratch, ScanFlags::empty());
    let spans = scratch.matches().iter().map(|m| m.span.clone()).collect();
    (spans, end)
}

pub fn x2(pattern: &str, text: &str, from: usize, to: usize) {
    let caps = compile(pattern)
        .find(text)
        .unwrap_or_else(|| panic!("x2: expected match for {pattern:?} against {text:?}"));
    assert_eq!(
        caps.get(0).map(|m| m.range()),
        Some(from..to),
        "x2: wrong span for {pattern:?} against {text:?}"
    );
}

pub fn x3(pattern: &str, text: &str, from: usize, to: usize, mem: usize) {
    let caps = compile(pattern)
        .find(text)
        .unwrap_or_else(|| panic!("x3: expected match for {pattern:?} against {text:?}"));
    assert_eq!(
        caps.get(mem).map(|m| m.range()),
        Some(from..to),
        "x3: wrong span for group {mem} of {pattern:?} against {text:?}"
    );
}

pub fn n(pattern: &str, text: &str) {
    assert!(
        compile(pattern).find(text).is_none(),
        "n: expected no match for {pattern:?} against {text:?}"
    );
}
