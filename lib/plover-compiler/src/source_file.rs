use plover_syntax_tree::SyntaxNode;

/// A source file of one submission, with its parsed syntax tree.
///
/// Bound symbols live in the compilation's global scope, not here.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    source: String,
    file_id: usize,
    syntax_tree: SyntaxNode,
}

impl SourceFile {
    pub(crate) fn new(name: String, source: String, file_id: usize, syntax_tree: SyntaxNode) -> Self {
        Self {
            name,
            source,
            file_id,
            syntax_tree,
        }
    }

    /// Get the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the source code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Id of the file in the compilation's diagnostic context.
    pub fn file_id(&self) -> usize {
        self.file_id
    }

    pub fn syntax_tree(&self) -> &SyntaxNode {
        &self.syntax_tree
    }
}
