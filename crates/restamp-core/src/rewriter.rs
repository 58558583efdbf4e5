//! Minimal-diff rewriting of modifier lists.
//!
//! Kept tokens never move. Trivia of dropped tokens is carried forward until
//! a kept token, the inserted visibility token, or the owner element absorbs
//! it, so comments are relocated but never lost.

use std::borrow::Cow;
use std::mem;

use restamp_at::{AccessLevel, AccessTransform, FinalityChange};
use restamp_syntax::{ModifierKind, ModifierToken, Trivia};

/// Result of rewriting one modifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite<'a> {
    /// The new tokens; borrowed from the input when nothing changed.
    pub tokens: Cow<'a, [ModifierToken]>,
    /// Trivia of the element following the modifiers.
    pub owner_trivia: Trivia,
    /// Whether the rendered text differs from the input.
    pub changed: bool,
}

/// Earliest slot for the visibility token that represents the target access.
#[derive(Debug)]
struct Mark {
    index: usize,
    trivia: Trivia,
    /// False once a token of the target level is known to survive, or when
    /// the target needs no token at all.
    useful: bool,
}

impl Mark {
    fn placeholder() -> Self {
        Self {
            index: 0,
            trivia: Trivia::default(),
            useful: false,
        }
    }
}

/// Applies access transforms to modifier token sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierRewriter;

impl ModifierRewriter {
    /// Rewrites `tokens` so they express `transform`.
    ///
    /// `owner_trivia` belongs to whatever follows the modifier list and
    /// receives orphaned trivia when no token is left to hold it. When the
    /// transform is already satisfied the input slice is returned borrowed
    /// and `changed` is false.
    #[must_use]
    pub fn rewrite<'a>(
        transform: AccessTransform,
        tokens: &'a [ModifierToken],
        owner_trivia: &Trivia,
    ) -> Rewrite<'a> {
        let target = transform.access();
        let mut splice = Splice::new(owner_trivia.clone());
        if matches!(target, None | Some(AccessLevel::PackagePrivate)) {
            splice.mark = Some(Mark::placeholder());
        }

        for token in tokens {
            splice.scan(token, transform);
        }

        if let Some(level) = target {
            splice.place_visibility(level);
        }
        splice.flush_pending();
        if transform.finality() == FinalityChange::Add {
            splice.add_final();
        }

        if splice.changed {
            Rewrite {
                tokens: Cow::Owned(splice.out),
                owner_trivia: splice.owner,
                changed: true,
            }
        } else {
            Rewrite {
                tokens: Cow::Borrowed(tokens),
                owner_trivia: owner_trivia.clone(),
                changed: false,
            }
        }
    }
}

/// Scan state for one rewrite.
struct Splice {
    out: Vec<ModifierToken>,
    pending: Trivia,
    mark: Option<Mark>,
    owner: Trivia,
    changed: bool,
    final_kept: bool,
}

impl Splice {
    fn new(owner: Trivia) -> Self {
        Self {
            out: Vec::new(),
            pending: Trivia::default(),
            mark: None,
            owner,
            changed: false,
            final_kept: false,
        }
    }

    fn scan(&mut self, token: &ModifierToken, transform: AccessTransform) {
        match token.kind() {
            ModifierKind::Fixed(_) => self.keep(token),
            ModifierKind::Final if transform.finality() == FinalityChange::Remove => {
                self.drop_token(token);
            }
            ModifierKind::Final => {
                self.final_kept = true;
                self.keep(token);
            }
            ModifierKind::Visibility(level) => match transform.access() {
                None => self.keep(token),
                Some(target) if target == *level => {
                    match self.mark.as_mut() {
                        Some(mark) => mark.useful = false,
                        None => self.mark = Some(Mark::placeholder()),
                    }
                    self.keep(token);
                }
                Some(_) => {
                    self.drop_token(token);
                    if self.mark.is_none() {
                        self.mark = Some(Mark {
                            index: self.out.len(),
                            trivia: mem::take(&mut self.pending),
                            useful: true,
                        });
                    }
                }
            },
        }
    }

    fn keep(&mut self, token: &ModifierToken) {
        let mut kept = token.clone();
        let trivia = mem::take(&mut self.pending).fill_if_empty(kept.take_trivia());
        kept.set_trivia(trivia);
        self.out.push(kept);
    }

    fn drop_token(&mut self, token: &ModifierToken) {
        self.pending = mem::take(&mut self.pending).merge(token.trivia().clone());
        self.changed = true;
    }

    /// Inserts the target visibility token when one is still needed and
    /// hands the mark's trivia to whatever occupies its slot.
    fn place_visibility(&mut self, level: AccessLevel) {
        let mark = self.mark.take().unwrap_or_else(|| self.synthesise_mark());
        if mark.useful {
            let index = mark.index.min(self.out.len());
            self.out.insert(
                index,
                ModifierToken::new(ModifierKind::Visibility(level), Trivia::default()),
            );
            self.changed = true;
        }
        match self.out.get_mut(mark.index) {
            Some(slot) => {
                let merged = mark.trivia.merge(slot.take_trivia());
                slot.set_trivia(merged);
            }
            None => self.pending = mark.trivia.merge(mem::take(&mut self.pending)),
        }
    }

    /// Opens a slot at the front, moving the leading trivia onto it.
    fn synthesise_mark(&mut self) -> Mark {
        let trivia = match self.out.first_mut() {
            Some(first) => {
                let leading = first.take_trivia();
                first.set_trivia(Trivia::single_space());
                leading
            }
            None => {
                let owner = mem::replace(&mut self.owner, Trivia::single_space());
                mem::take(&mut self.pending).merge(owner)
            }
        };
        Mark {
            index: 0,
            trivia,
            useful: true,
        }
    }

    fn flush_pending(&mut self) {
        let owner = mem::take(&mut self.owner);
        self.owner = mem::take(&mut self.pending).fill_if_empty(owner);
    }

    fn add_final(&mut self) {
        if self.final_kept {
            return;
        }
        let trivia = if self.out.is_empty() {
            mem::replace(&mut self.owner, Trivia::single_space())
        } else {
            Trivia::single_space()
        };
        self.out
            .push(ModifierToken::new(ModifierKind::Final, trivia));
        self.changed = true;
    }
}
