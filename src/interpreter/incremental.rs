use std::collections::HashSet;

use crate::{
    ast::Expr,
    interpreter::{
        evaluator::core::{Env, eval},
        parser::core::parse_line,
        value::{core::Value, format::DEFAULT_MAX_WIDTH},
    },
};

/// Dependency information extracted from a parsed line.
#[derive(Debug, Clone, Default)]
pub struct DepsInfo {
    /// Names the line reads: variables and `#N` line references.
    pub vars:     Vec<String>,
    /// `true` when the line transitively calls `now()`.
    pub uses_now: bool,
    /// The bound name when the line is an assignment.
    pub assigns:  Option<String>,
}

/// Cached state for a single buffer line.
#[derive(Debug, Clone)]
struct CachedLine {
    /// The last observed text. Seeded with a NUL sentinel so fresh
    /// entries always count as changed.
    text:     String,
    /// The parsed node, when the last parse succeeded.
    node:     Option<Expr>,
    /// The last successful value.
    value:    Option<Value>,
    /// The last error message, when the line failed.
    error:    Option<String>,
    /// Dependencies of the cached node.
    deps:     DepsInfo,
    /// Blank or comment line.
    is_empty: bool,
}

impl Default for CachedLine {
    fn default() -> Self {
        Self { text:     "\u{0}".to_string(),
               node:     None,
               value:    None,
               error:    None,
               deps:     DepsInfo::default(),
               is_empty: false, }
    }
}

/// The rendered outcome of one line in an evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineResult {
    /// The gutter text: a formatted value, an error message, or empty.
    pub text:     String,
    /// `true` when `text` is an error message.
    pub is_error: bool,
}

impl LineResult {
    fn empty() -> Self {
        Self { text:     String::new(),
               is_error: false, }
    }

    fn value(text: String) -> Self {
        Self { text,
               is_error: false }
    }

    fn error(text: String) -> Self {
        Self { text,
               is_error: true }
    }
}

/// The incremental buffer evaluator.
///
/// Holds one cache entry per line and re-evaluates only lines that are
/// dirty: changed text, a `now()` dependency when the second hand
/// ticked, or a dependency on a name whose value changed earlier in the
/// pass. The cache is owned by the host for the lifetime of a buffer and
/// accessed serially.
#[derive(Default)]
pub struct EvalState {
    lines:     Vec<CachedLine>,
    max_width: Option<usize>,
}

impl EvalState {
    /// Creates an empty evaluator state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display-width budget used when rendering results. The
    /// budget steers the formatter's fraction / decimal / scientific
    /// choice.
    pub fn set_max_display_width(&mut self, width: usize) {
        self.max_width = Some(width);
    }

    /// Evaluates a whole buffer incrementally.
    ///
    /// Returns one [`LineResult`] per input line, in order. `now_ticked`
    /// tells the engine the host clock's second hand advanced since the
    /// previous pass, which dirties every line whose dependencies include
    /// `now`.
    ///
    /// # Example
    /// ```
    /// use ratcalc::EvalState;
    ///
    /// let mut state = EvalState::new();
    /// let results = state.eval_all(&["x = 10", "x + 5"], false);
    /// assert_eq!(results[0].text, "10");
    /// assert_eq!(results[1].text, "15");
    ///
    /// let results = state.eval_all(&["x = 20", "x + 5"], false);
    /// assert_eq!(results[1].text, "25");
    /// ```
    pub fn eval_all<S: AsRef<str>>(&mut self, lines: &[S], now_ticked: bool) -> Vec<LineResult> {
        let max_width = self.max_width.unwrap_or(DEFAULT_MAX_WIDTH);

        // A changed line count resets the cache wholesale; `#N` bindings
        // shift meaning, so nothing cached is trustworthy.
        if lines.len() != self.lines.len() {
            self.lines = vec![CachedLine::default(); lines.len()];
        }

        let mut env = Env::new();
        let mut changed_vars: HashSet<String> = HashSet::new();
        let mut results = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let cached = &mut self.lines[i];

            let trimmed = line.trim();
            let is_empty = trimmed.is_empty()
                           || trimmed.starts_with(';')
                           || trimmed.starts_with("//");

            let text_changed = cached.text != line;
            let mut dirty = text_changed;
            if !dirty && cached.deps.uses_now && now_ticked {
                dirty = true;
            }
            if !dirty && !cached.is_empty {
                dirty = cached.deps.vars.iter().any(|dep| changed_vars.contains(dep));
            }

            if !dirty {
                // Clean: re-inject the cached bindings and re-emit.
                if !cached.is_empty
                   && cached.error.is_none()
                   && let Some(value) = &cached.value
                {
                    if let Some(name) = &cached.deps.assigns {
                        env.insert(name.clone(), value.clone());
                    }
                    env.insert(line_ref(i), value.clone());
                }
                results.push(match (&cached.error, &cached.value) {
                                 _ if cached.is_empty => LineResult::empty(),
                                 (Some(message), _) => LineResult::error(message.clone()),
                                 (None, Some(value)) => {
                                     LineResult::value(value.to_display_string(max_width))
                                 },
                                 (None, None) => LineResult::empty(),
                             });
                continue;
            }

            // Dirty: refresh the cache entry from scratch.
            let old_value = cached.value.take();
            let old_error = cached.error.take();
            let old_assigns = cached.deps.assigns.take();

            cached.text = line.to_string();
            cached.is_empty = is_empty;
            cached.node = None;
            cached.deps = DepsInfo::default();

            if is_empty {
                // The line used to produce something; its bindings are
                // gone, so dependents must re-evaluate.
                if old_value.is_some() || old_error.is_some() {
                    if let Some(name) = &old_assigns {
                        changed_vars.insert(name.clone());
                    }
                    changed_vars.insert(line_ref(i));
                }
                results.push(LineResult::empty());
                continue;
            }

            let outcome = match parse_line(line) {
                Err(parse_err) => Err(parse_err.to_string()),
                Ok(None) => {
                    cached.is_empty = true;
                    if old_value.is_some() || old_error.is_some() {
                        if let Some(name) = &old_assigns {
                            changed_vars.insert(name.clone());
                        }
                        changed_vars.insert(line_ref(i));
                    }
                    results.push(LineResult::empty());
                    continue;
                },
                Ok(Some(node)) => {
                    cached.deps = collect_deps(&node);
                    let evaluated = eval(&node, &mut env).map_err(|e| e.to_string());
                    cached.node = Some(node);
                    evaluated
                },
            };

            let changed = match &outcome {
                Ok(value) => {
                    old_error.is_some()
                    || !old_value.as_ref().is_some_and(|old| old.same_result(value))
                },
                Err(message) => old_error.as_ref() != Some(message),
            };

            match outcome {
                Ok(value) => {
                    if let Some(name) = &cached.deps.assigns {
                        env.insert(name.clone(), value.clone());
                        if changed {
                            changed_vars.insert(name.clone());
                        }
                    }
                    env.insert(line_ref(i), value.clone());
                    if changed {
                        changed_vars.insert(line_ref(i));
                    }
                    results.push(LineResult::value(value.to_display_string(max_width)));
                    cached.value = Some(value);
                },
                Err(message) => {
                    // Errors bind nothing; dependents fail on their own.
                    if changed {
                        if let Some(name) = &cached.deps.assigns {
                            changed_vars.insert(name.clone());
                        }
                        changed_vars.insert(line_ref(i));
                    }
                    results.push(LineResult::error(message.clone()));
                    cached.error = Some(message);
                },
            }

            // A name this line no longer binds has effectively changed.
            if let Some(old_name) = old_assigns
               && cached.deps.assigns.as_ref() != Some(&old_name)
            {
                changed_vars.insert(old_name);
            }
        }

        results
    }
}

fn line_ref(i: usize) -> String {
    format!("#{}", i + 1)
}

/// Collects the dependency record of a parsed line by walking the AST:
/// variable references contribute their names, an assignment records its
/// target and recurses into the right-hand side, and a call to `now`
/// marks the clock dependency. Detection is syntactic, so `now()` nested
/// under conversions or unit wrappers still re-evaluates on each tick.
#[must_use]
pub fn collect_deps(node: &Expr) -> DepsInfo {
    let mut info = DepsInfo::default();
    walk_deps(node, &mut info);
    info
}

fn walk_deps(node: &Expr, info: &mut DepsInfo) {
    match node {
        Expr::Variable { name } => info.vars.push(name.clone()),
        Expr::Assign { name, expr } => {
            info.assigns = Some(name.clone());
            walk_deps(expr, info);
        },
        Expr::Call { name, args } => {
            if name == "now" {
                info.uses_now = true;
            }
            for arg in args {
                walk_deps(arg, info);
            }
        },
        Expr::Binary { left, right, .. } => {
            walk_deps(left, info);
            walk_deps(right, info);
        },
        Expr::Unary { operand, .. } => walk_deps(operand, info),
        Expr::Unit { expr, .. }
        | Expr::ZoneIn { expr, .. }
        | Expr::AmPm { expr, .. }
        | Expr::Percent { expr }
        | Expr::Factorial { expr }
        | Expr::Convert { expr, .. } => walk_deps(expr, info),
        Expr::Number { .. } | Expr::TimeOfDay { .. } => {},
    }
}
