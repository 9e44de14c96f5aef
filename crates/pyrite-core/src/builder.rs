/*! Single-pass tree walk that emits control-flow nodes and backward edges.
 *
 * The walker threads a frontier - the ordered set of live predecessors for the next construct -
 * through sequential, branching, and looping code. Branches return the concatenation of both arm
 * frontiers rather than a join node; loops close their back edge by re-parenting the loop-entry
 * sentinel. Enclosing-scope questions (which loop does this `break` leave, which function does
 * this `return` exit) are answered by an explicit scope stack carried down the walk.
 */

use crate::graph::{self, Cfg, FunctionEntry, FunctionTable};
use crate::node::{Annotation, Label, NodeId};
use crate::store::NodeStore;
use crate::syntax::{classify, SyntaxKind};
use crate::{CfgError, Result};
use tree_sitter::{Node, Tree};

/// Live predecessors for the next emitted node. Empty after a statement that
/// never falls through (`break`, `continue`, `return`).
type Frontier = Vec<NodeId>;

/// Innermost-scope markers, pushed while walking loop and function bodies.
#[derive(Debug)]
enum Scope {
    Loop(NodeId),
    Function { enter: NodeId, name: String },
}

/// Builds one control-flow graph from one parsed module.
///
/// The builder owns the node store while the graph is under construction;
/// only the finalized [`Cfg`] it returns exposes queries.
pub struct CfgBuilder<'tree> {
    source: &'tree str,
    store: NodeStore<'tree>,
    functions: FunctionTable,
    scopes: Vec<Scope>,
}

impl<'tree> CfgBuilder<'tree> {
    /// Walk `tree`, transpose the edges, and link call sites.
    ///
    /// Fails fast on the first unsupported construct or scope violation; no
    /// partial graph is ever returned.
    pub fn build(tree: &'tree Tree, source: &'tree str) -> Result<Cfg<'tree>> {
        let mut builder = CfgBuilder {
            source,
            store: NodeStore::new(),
            functions: FunctionTable::new(),
            scopes: Vec::new(),
        };

        let start = builder.emit(&[], None, None, Annotation::Text("<start>".to_string()));
        let frontier = builder.walk(tree.root_node(), vec![start])?;
        let stop = builder.emit(&frontier, None, None, Annotation::Text("<stop>".to_string()));

        let CfgBuilder {
            mut store,
            functions,
            ..
        } = builder;
        graph::index_children(&mut store);
        graph::link_functions(&mut store, &functions);

        Ok(Cfg::new(store, source, start, stop, functions))
    }

    fn emit(
        &mut self,
        parents: &[NodeId],
        source_ref: Option<Node<'tree>>,
        label: Option<Label>,
        annotation: Annotation,
    ) -> NodeId {
        let id = self.store.add(parents, source_ref, label, annotation);
        if let Some(name) = self.current_function() {
            if let Some(node) = self.store.get_mut(id) {
                node.function = Some(name);
            }
        }
        id
    }

    fn text(&self, node: Node<'tree>) -> &'tree str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn line(node: Node<'tree>) -> usize {
        node.start_position().row + 1
    }

    fn field(&self, node: Node<'tree>, name: &str) -> Result<Node<'tree>> {
        node.child_by_field_name(name)
            .ok_or_else(|| CfgError::MalformedSyntax {
                kind: node.kind().to_string(),
                line: Self::line(node),
            })
    }

    fn current_function(&self) -> Option<String> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Function { name, .. } => Some(name.clone()),
            Scope::Loop(_) => None,
        })
    }

    /// Innermost loop of the current scope; a function boundary hides any
    /// loop outside it.
    fn innermost_loop(&self) -> Option<NodeId> {
        for scope in self.scopes.iter().rev() {
            match scope {
                Scope::Loop(entry) => return Some(*entry),
                Scope::Function { .. } => return None,
            }
        }
        None
    }

    fn innermost_function(&self) -> Option<NodeId> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Function { enter, .. } => Some(*enter),
            Scope::Loop(_) => None,
        })
    }

    /// Dispatch on the classified kind of `node`.
    fn walk(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        match classify(node.kind())? {
            SyntaxKind::Comment => Ok(frontier),
            SyntaxKind::Module => self.walk_block(node, frontier),
            SyntaxKind::ExpressionStatement => {
                let mut inner = frontier;
                let mut cursor = node.walk();
                let expressions: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
                // An assignment child emits its own statement node; wrapping
                // it again would duplicate the statement.
                let assignments_only = !expressions.is_empty()
                    && expressions.iter().all(|expression| {
                        matches!(
                            classify(expression.kind()),
                            Ok(SyntaxKind::Assignment | SyntaxKind::AugmentedAssignment)
                        )
                    });
                for expression in expressions {
                    inner = self.walk(expression, inner)?;
                }
                if assignments_only {
                    Ok(inner)
                } else {
                    Ok(vec![self.emit(&inner, Some(node), None, Annotation::Source)])
                }
            }
            SyntaxKind::Assignment | SyntaxKind::AugmentedAssignment => {
                self.walk_assignment(node, frontier)
            }
            SyntaxKind::IfStatement => self.walk_conditional(node, frontier),
            SyntaxKind::WhileStatement => self.walk_while(node, frontier),
            SyntaxKind::ForStatement => self.walk_for(node, frontier),
            SyntaxKind::BreakStatement => self.walk_break(node, frontier),
            SyntaxKind::ContinueStatement => self.walk_continue(node, frontier),
            SyntaxKind::ReturnStatement => self.walk_return(node, frontier),
            SyntaxKind::FunctionDefinition => self.walk_function_definition(node, frontier),
            SyntaxKind::DecoratedDefinition => {
                let definition = self.field(node, "definition")?;
                self.walk(definition, frontier)
            }
            SyntaxKind::PassStatement
            | SyntaxKind::ImportStatement
            | SyntaxKind::ImportFromStatement => {
                Ok(vec![self.emit(&frontier, Some(node), None, Annotation::Source)])
            }
            SyntaxKind::Call => self.walk_call(node, frontier),
            SyntaxKind::KeywordArgument => {
                let value = self.field(node, "value")?;
                self.walk(value, frontier)
            }
            SyntaxKind::BinaryOperator | SyntaxKind::BooleanOperator => {
                let left = self.walk(self.field(node, "left")?, frontier)?;
                let right = self.walk(self.field(node, "right")?, left)?;
                Ok(vec![self.emit(&right, Some(node), None, Annotation::Hidden)])
            }
            SyntaxKind::ComparisonOperator => {
                // Operands are the named children, left to right.
                let mut operands = frontier;
                let mut cursor = node.walk();
                let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
                for child in children {
                    operands = self.walk(child, operands)?;
                }
                Ok(vec![self.emit(&operands, Some(node), None, Annotation::Hidden)])
            }
            SyntaxKind::UnaryOperator | SyntaxKind::NotOperator => {
                let id = self.emit(&frontier, Some(node), None, Annotation::Hidden);
                self.walk(self.field(node, "argument")?, vec![id])
            }
            SyntaxKind::ParenthesizedExpression => {
                let inner = node.named_child(0).ok_or_else(|| CfgError::MalformedSyntax {
                    kind: node.kind().to_string(),
                    line: Self::line(node),
                })?;
                self.walk(inner, frontier)
            }
            SyntaxKind::Pair => {
                let key = self.walk(self.field(node, "key")?, frontier)?;
                self.walk(self.field(node, "value")?, key)
            }
            SyntaxKind::Composite => {
                let mut elements = frontier;
                let mut cursor = node.walk();
                let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
                for child in children {
                    elements = self.walk(child, elements)?;
                }
                Ok(vec![self.emit(&elements, Some(node), None, Annotation::Hidden)])
            }
            SyntaxKind::Attribute | SyntaxKind::Identifier | SyntaxKind::Literal => {
                Ok(vec![self.emit(&frontier, Some(node), None, Annotation::Hidden)])
            }
            // Clause kinds only occur inside an if-statement's alternative
            // list; meeting one at dispatch means the tree is malformed.
            SyntaxKind::ElifClause | SyntaxKind::ElseClause => Err(CfgError::MalformedSyntax {
                kind: node.kind().to_string(),
                line: Self::line(node),
            }),
        }
    }

    /// Thread the frontier through the named children of a block.
    fn walk_block(&mut self, block: Node<'tree>, mut frontier: Frontier) -> Result<Frontier> {
        let mut cursor = block.walk();
        let statements: Vec<Node<'tree>> = block.named_children(&mut cursor).collect();
        for statement in statements {
            frontier = self.walk(statement, frontier)?;
        }
        Ok(frontier)
    }

    fn walk_assignment(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let left = self.field(node, "left")?;
        if matches!(left.kind(), "pattern_list" | "tuple_pattern") {
            return Err(CfgError::UnsupportedSyntax("parallel-assignment".to_string()));
        }
        let id = self.emit(&frontier, Some(node), None, Annotation::Source);
        match node.child_by_field_name("right") {
            Some(value) => self.walk(value, vec![id]),
            // Bare annotated declaration (`x: int`) carries no value.
            None => Ok(vec![id]),
        }
    }

    /// `if`: fork into labeled `True`/`False` branch markers and return the
    /// concatenation of both arm frontiers. There is no join node; code after
    /// the `if` receives both tails as its combined predecessor set.
    fn walk_conditional(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let condition = self.field(node, "condition")?;
        let test_frontier = self.walk(condition, frontier)?;
        let test = self.emit(
            &test_frontier,
            Some(node),
            None,
            Annotation::Text(format!("if: {}", self.text(condition))),
        );

        let g_true = self.emit(&[test], None, Some(Label::IfTrue), Annotation::Hidden);
        let consequence = self.field(node, "consequence")?;
        let mut result = self.walk_block(consequence, vec![g_true])?;

        let g_false = self.emit(&[test], None, Some(Label::IfFalse), Annotation::Hidden);
        let mut cursor = node.walk();
        let alternatives: Vec<Node<'tree>> =
            node.children_by_field_name("alternative", &mut cursor).collect();
        let false_frontier = self.walk_alternatives(&alternatives, vec![g_false])?;

        result.extend(false_frontier);
        Ok(result)
    }

    /// `elif` chains fork again under the previous false branch; a trailing
    /// `else` threads the false frontier through its body.
    fn walk_alternatives(
        &mut self,
        alternatives: &[Node<'tree>],
        frontier: Frontier,
    ) -> Result<Frontier> {
        let Some((first, rest)) = alternatives.split_first() else {
            return Ok(frontier);
        };
        match classify(first.kind())? {
            SyntaxKind::ElifClause => {
                let condition = self.field(*first, "condition")?;
                let test_frontier = self.walk(condition, frontier)?;
                let test = self.emit(
                    &test_frontier,
                    Some(*first),
                    None,
                    Annotation::Text(format!("if: {}", self.text(condition))),
                );
                let g_true = self.emit(&[test], None, Some(Label::IfTrue), Annotation::Hidden);
                let consequence = self.field(*first, "consequence")?;
                let mut result = self.walk_block(consequence, vec![g_true])?;
                let g_false = self.emit(&[test], None, Some(Label::IfFalse), Annotation::Hidden);
                result.extend(self.walk_alternatives(rest, vec![g_false])?);
                Ok(result)
            }
            SyntaxKind::ElseClause => {
                let body = self.field(*first, "body")?;
                self.walk_block(body, frontier)
            }
            _ => Err(CfgError::UnsupportedSyntax(first.kind().to_string())),
        }
    }

    /// `while`: a loop-entry sentinel (id reserved before the test is built)
    /// guards the test; the body's final frontier is added back as parents of
    /// the sentinel, closing the loop. The frontier after the loop is the
    /// sentinel's `exits` - the false branch plus any `break` found later.
    fn walk_while(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let condition = self.field(node, "condition")?;
        let loop_id = self.store.peek_id();
        let loop_entry = self.emit(
            &frontier,
            Some(node),
            Some(Label::LoopEntry),
            Annotation::Text(format!("{}:while", loop_id.0)),
        );

        let test_frontier = self.walk(condition, vec![loop_entry])?;
        let test = self.emit(
            &test_frontier,
            Some(condition),
            None,
            Annotation::Text(format!("if: {}", self.text(condition))),
        );
        let g_false = self.emit(&[test], None, Some(Label::IfFalse), Annotation::Hidden);
        let g_true = self.emit(&[test], None, Some(Label::IfTrue), Annotation::Hidden);
        if let Some(entry) = self.store.get_mut(loop_entry) {
            entry.exits = Some(vec![g_false]);
        }

        self.scopes.push(Scope::Loop(loop_entry));
        let body = self.field(node, "body")?;
        let body_frontier = self.walk_block(body, vec![g_true]);
        self.scopes.pop();
        let body_frontier = body_frontier?;

        self.store.add_parents(loop_entry, &body_frontier);

        Ok(self
            .store
            .get(loop_entry)
            .and_then(|entry| entry.exits.clone())
            .unwrap_or_default())
    }

    /// `for`: rewritten as iterator initialization, a continuation test, and
    /// a loop body using the same loop-entry mechanics as `while`. The
    /// iteration handle is a synthesized name scoped to this loop.
    fn walk_for(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let right = self.field(node, "right")?;
        let body = self.field(node, "body")?;

        let loop_id = self.store.peek_id().0;
        let for_pre = self.emit(&frontier, None, None, Annotation::Hidden);
        let handle = format!("__iv_{}", loop_id);
        let init = self.emit(
            &[for_pre],
            None,
            None,
            Annotation::Text(format!("{} = iter({})", handle, self.text(right))),
        );

        let loop_entry = self.emit(
            &[init],
            Some(node),
            Some(Label::LoopEntry),
            Annotation::Text(format!("{}: for", loop_id)),
        );
        let test_eval = self.emit(&[loop_entry], None, None, Annotation::Hidden);
        let test = self.emit(
            &[test_eval],
            None,
            None,
            Annotation::Text(format!("for: {}.__length_hint__() > 0", handle)),
        );
        let g_false = self.emit(&[test], None, Some(Label::IfFalse), Annotation::Hidden);
        let g_true = self.emit(&[test], None, Some(Label::IfTrue), Annotation::Hidden);
        if let Some(entry) = self.store.get_mut(loop_entry) {
            entry.exits = Some(vec![g_false]);
        }

        self.scopes.push(Scope::Loop(loop_entry));
        let body_frontier = self.walk_block(body, vec![g_true]);
        self.scopes.pop();
        let body_frontier = body_frontier?;

        self.store.add_parents(loop_entry, &body_frontier);

        Ok(self
            .store
            .get(loop_entry)
            .and_then(|entry| entry.exits.clone())
            .unwrap_or_default())
    }

    /// `break` registers itself as a loop exit and kills the frontier.
    fn walk_break(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let loop_entry = self
            .innermost_loop()
            .ok_or(CfgError::BreakOutsideLoop(Self::line(node)))?;
        let id = self.emit(&frontier, Some(node), None, Annotation::Source);
        if let Some(entry) = self.store.get_mut(loop_entry) {
            if let Some(exits) = entry.exits.as_mut() {
                exits.push(id);
            }
        }
        Ok(Vec::new())
    }

    /// `continue` re-enters the loop test directly.
    fn walk_continue(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let loop_entry = self
            .innermost_loop()
            .ok_or(CfgError::ContinueOutsideLoop(Self::line(node)))?;
        let id = self.emit(&frontier, Some(node), None, Annotation::Source);
        self.store.add_parent(loop_entry, id);
        Ok(Vec::new())
    }

    /// `return` evaluates its value, registers the return point on the
    /// enclosing function's enter node, and kills the frontier.
    fn walk_return(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let enter = self
            .innermost_function()
            .ok_or(CfgError::ReturnOutsideFunction(Self::line(node)))?;

        let mut cursor = node.walk();
        let values: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
        let mut value_frontier = frontier;
        for value in values {
            value_frontier = self.walk(value, value_frontier)?;
        }

        let id = self.emit(&value_frontier, Some(node), None, Annotation::Source);
        if let Some(function) = self.store.get_mut(enter) {
            if let Some(returns) = function.returns.as_mut() {
                returns.push(id);
            }
        }
        Ok(Vec::new())
    }

    /// A function definition emits an enter node and walks its body under a
    /// function scope, but returns the caller's frontier unchanged - defining
    /// a function does not advance control flow at its lexical position.
    fn walk_function_definition(
        &mut self,
        node: Node<'tree>,
        frontier: Frontier,
    ) -> Result<Frontier> {
        let name = self.text(self.field(node, "name")?).to_string();
        let enter = self.emit(
            &frontier,
            Some(node),
            Some(Label::Enter),
            Annotation::Text(format!("<define>: {}", name)),
        );
        if let Some(function) = self.store.get_mut(enter) {
            function.returns = Some(Vec::new());
            // The definition line belongs to the function it defines.
            function.function = Some(name.clone());
        }

        self.scopes.push(Scope::Function {
            enter,
            name: name.clone(),
        });
        let body = self.field(node, "body");
        let body_frontier = body.and_then(|body| self.walk_block(body, vec![enter]));
        self.scopes.pop();
        let body_frontier = body_frontier?;

        // Implicit fallthrough at the end of the body is a return point too.
        let returns = match self.store.get_mut(enter) {
            Some(function) => match function.returns.as_mut() {
                Some(returns) => {
                    returns.extend(body_frontier);
                    returns.clone()
                }
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        self.functions.insert(name, FunctionEntry { enter, returns });
        Ok(frontier)
    }

    /// A call evaluates its arguments in order, then emits a call-labeled
    /// node carrying the callee name for the linker to resolve.
    fn walk_call(&mut self, node: Node<'tree>, frontier: Frontier) -> Result<Frontier> {
        let function = self.field(node, "function")?;
        let mut args_frontier = frontier;
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            let args: Vec<Node<'tree>> = arguments.named_children(&mut cursor).collect();
            for arg in args {
                args_frontier = self.walk(arg, args_frontier)?;
            }
        }

        let id = self.emit(&args_frontier, Some(node), Some(Label::Call), Annotation::Hidden);
        let callee = self.text(function).to_string();
        if let Some(call_node) = self.store.get_mut(id) {
            call_node.calls.push(callee);
        }
        Ok(vec![id])
    }
}
