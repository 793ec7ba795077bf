#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(unused_crate_dependencies)]

use std::fmt::Display;

use colored::{Color, ColoredString, Colorize};

/// Trait enabling pretty-printing for custom types
///
/// It will allow to generate configurable displayable data
pub trait PrettyPrintable {
    /// Data required for pretty-printing
    type Context: ?Sized;

    /// Generate pretty-printing data for later processing
    fn generate_pretty_data(&self, ctx: &Self::Context) -> PrettyPrintablePiece;

    /// Obtain a [`Display`] type from this value
    fn display<'p, 'c>(
        &'p self,
        ctx: &'c Self::Context,
        opts: PrettyPrintOptions,
    ) -> PrettyPrintableDisplay<'p, 'c, Self>
    where
        Self: Sized,
    {
        PrettyPrintableDisplay {
            source: self,
            ctx,
            opts,
            no_colors: false,
        }
    }
}

/// Shorthands for types that don't need any context to be pretty-printed
pub trait PrettyPrintableExt: PrettyPrintable<Context = ()> {
    /// Render on a single line, without colors
    fn display_inline(&self) -> String {
        self.generate_pretty_data(&())
            .render_to_string(PrettyPrintOptions::inline())
    }

    /// Render on multiple lines if needed, without colors
    fn display_multiline(&self) -> String {
        self.generate_pretty_data(&())
            .render_to_string(PrettyPrintOptions::multiline())
    }
}

impl<P: PrettyPrintable<Context = ()> + ?Sized> PrettyPrintableExt for P {}

/// Pretty-printable with options
pub struct PrettyPrintableDisplay<'p, 'c, P: PrettyPrintable> {
    pub source: &'p P,
    pub ctx: &'c P::Context,
    pub opts: PrettyPrintOptions,
    pub no_colors: bool,
}

impl<P: PrettyPrintable> PrettyPrintableDisplay<'_, '_, P> {
    pub fn no_colors(mut self) -> Self {
        self.no_colors = true;
        self
    }
}

impl<P: PrettyPrintable> Display for PrettyPrintableDisplay<'_, '_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = Ok(());

        self.source
            .generate_pretty_data(self.ctx)
            .render(self.opts, |styled| {
                if result.is_ok() {
                    result = if self.no_colors {
                        f.write_str(&styled.inner().input)
                    } else {
                        write!(f, "{}", styled.inner())
                    };
                }
            });

        result
    }
}

/// Colored string
#[derive(Debug, Clone)]
pub struct Styled(ColoredString);

impl Styled {
    pub fn inner(&self) -> &ColoredString {
        &self.0
    }

    pub fn colored(content: impl AsRef<str>, color: Color) -> Self {
        Self(content.as_ref().color(color))
    }

    pub fn colorless(content: impl AsRef<str>) -> Self {
        Self(ColoredString::from(content.as_ref()))
    }

    fn len_chars(&self) -> usize {
        self.0.input.chars().count()
    }
}

impl From<ColoredString> for Styled {
    fn from(value: ColoredString) -> Self {
        Self(value)
    }
}

/// Pretty-printable piece
#[derive(Debug, Clone)]
pub enum PrettyPrintablePiece {
    /// Atom: a simple string with a single color
    Atomic(Styled),

    /// Join: a chain of pretty-printable pieces
    Join(Vec<PrettyPrintablePiece>),

    /// List: delimited items separated by commas
    ///
    /// Rendered on a single line (`{ a, b }`) when it fits, one item per line otherwise.
    /// Empty lists are rendered as `begin` directly followed by `end` (`{}`).
    List {
        begin: Styled,
        items: Vec<PrettyPrintablePiece>,
        end: Styled,

        /// Add a space after `begin` and before `end` when rendered on a single line
        padded: bool,
    },

    /// Empty: an empty piece
    Empty,
}

impl PrettyPrintablePiece {
    /// Create a colored atom
    pub fn colored_atomic(content: impl AsRef<str>, color: Color) -> Self {
        Self::Atomic(Styled::colored(content, color))
    }

    /// Create an atom without color
    pub fn colorless_atomic(content: impl AsRef<str>) -> Self {
        Self::Atomic(Styled::colorless(content))
    }
}

/// Options for pretty-printing
#[derive(Debug, Clone, Copy)]
pub struct PrettyPrintOptions {
    /// Break lists that don't fit on a single line
    pub pretty: bool,

    /// How many spaces a nesting level is indented with
    pub tab_size: usize,

    /// Ideal maximum line size
    ///
    /// Some lines may be larger than this limit, consider it a "best-effort"
    pub max_line_size: usize,

    /// Maximum number of items displayed for a single list
    pub max_items: usize,
}

impl PrettyPrintOptions {
    /// Render in a single line
    pub fn inline() -> Self {
        Self {
            pretty: false,
            tab_size: 0,
            max_line_size: 0,
            max_items: 100,
        }
    }

    /// Render on multiple lines when a list is too long to fit in a line
    pub fn multiline() -> Self {
        Self {
            pretty: true,
            tab_size: 2,
            max_line_size: 80,
            max_items: 100,
        }
    }
}

impl PrettyPrintablePiece {
    /// Count the characters this piece takes when rendered on a single line
    fn inline_len(&self, max_items: usize) -> usize {
        match self {
            PrettyPrintablePiece::Atomic(atom) => atom.len_chars(),

            PrettyPrintablePiece::Join(pieces) => {
                pieces.iter().map(|piece| piece.inline_len(max_items)).sum()
            }

            PrettyPrintablePiece::List {
                begin,
                items,
                end,
                padded,
            } => {
                let shown = items.len().min(max_items);

                let items_len = items
                    .iter()
                    .take(shown)
                    .map(|item| item.inline_len(max_items))
                    .sum::<usize>()
                    + shown.saturating_sub(1) * 2;

                let padding = if *padded && !items.is_empty() { 2 } else { 0 };

                begin.len_chars() + items_len + padding + end.len_chars()
            }

            PrettyPrintablePiece::Empty => 0,
        }
    }

    /// Render this piece using a processing function
    pub fn render(&self, opts: PrettyPrintOptions, mut w: impl FnMut(&Styled)) {
        self.render_at(opts, &mut w, 0);
    }

    /// Render this piece into a string, without colors
    pub fn render_to_string(&self, opts: PrettyPrintOptions) -> String {
        let mut out = String::new();
        self.render(opts, |styled| out.push_str(&styled.inner().input));
        out
    }

    fn render_at(&self, opts: PrettyPrintOptions, w: &mut impl FnMut(&Styled), indent: usize) {
        match self {
            PrettyPrintablePiece::Atomic(atom) => w(atom),

            PrettyPrintablePiece::Join(pieces) => {
                for piece in pieces {
                    piece.render_at(opts, w, indent);
                }
            }

            PrettyPrintablePiece::List {
                begin,
                items,
                end,
                padded,
            } => {
                w(begin);

                if items.is_empty() {
                    w(end);
                    return;
                }

                let shown = &items[..items.len().min(opts.max_items)];
                let hidden = items.len() - shown.len();

                let more = (hidden > 0).then(|| {
                    Styled::colored(
                        format!(
                            "... {hidden} more item{}",
                            if hidden > 1 { "s" } else { "" }
                        ),
                        Color::BrightBlack,
                    )
                });

                let fits = indent + self.inline_len(opts.max_items) <= opts.max_line_size;

                if !opts.pretty || fits {
                    let sep = Styled::colorless(", ");

                    if *padded {
                        w(&Styled::colorless(" "));
                    }

                    for (i, item) in shown.iter().enumerate() {
                        if i > 0 {
                            w(&sep);
                        }

                        item.render_at(opts, w, indent);
                    }

                    if let Some(more) = &more {
                        w(&sep);
                        w(more);
                    }

                    if *padded {
                        w(&Styled::colorless(" "));
                    }
                } else {
                    let inner_indent = indent + opts.tab_size;
                    let newline = Styled::colorless(format!("\n{}", " ".repeat(inner_indent)));
                    let sep = Styled::colorless(",");

                    for (i, item) in shown.iter().enumerate() {
                        if i > 0 {
                            w(&sep);
                        }

                        w(&newline);
                        item.render_at(opts, w, inner_indent);
                    }

                    if let Some(more) = &more {
                        w(&sep);
                        w(&newline);
                        w(more);
                    }

                    w(&Styled::colorless(format!("\n{}", " ".repeat(indent))));
                }

                w(end);
            }

            PrettyPrintablePiece::Empty => {}
        }
    }
}

impl PrettyPrintable for PrettyPrintablePiece {
    type Context = ();

    fn generate_pretty_data(&self, _: &Self::Context) -> PrettyPrintablePiece {
        self.clone()
    }
}
