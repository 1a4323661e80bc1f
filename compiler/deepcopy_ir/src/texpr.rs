//! Go type expression parser.
//!
//! Turns the textual types of the interchange model (`*example.com/api.Sub`,
//! `map[string][]int`, `struct{ A int }`) into interned [`TypeId`]s.
//! Qualified names use the full import path followed by `.Name`.

use crate::{Field, ModelError, PackageId, QualifiedName, TypeId, TypeKind, Universe};

/// Name resolution context for one declaration.
#[derive(Copy, Clone, Debug)]
pub struct TypeScope<'a> {
    /// Package unqualified names resolve into.
    pub package: PackageId,
    /// Type parameters of the enclosing declaration.
    pub type_params: &'a [String],
}

/// Parse `expr` and intern the resulting type.
pub fn parse_type_expr(
    universe: &mut Universe,
    scope: TypeScope<'_>,
    expr: &str,
) -> Result<TypeId, ModelError> {
    let mut parser = Parser {
        package_path: universe.package(scope.package).path.clone(),
        universe,
        scope,
        src: expr,
        pos: 0,
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < expr.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'u, 's> {
    universe: &'u mut Universe,
    scope: TypeScope<'s>,
    package_path: String,
    src: &'s str,
    pos: usize,
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '{' | '}' | '(' | ')' | '*' | ';' | ',' | '`' | '"' | '<'
        )
}

impl Parser<'_, '_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Skip spaces and tabs but stop at newlines, which separate struct fields.
    fn skip_inline_ws(&mut self) {
        let trimmed = self.rest().trim_start_matches([' ', '\t', '\r']);
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), ModelError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected `{token}`")))
        }
    }

    /// Consume `keyword` if it is not the prefix of a longer name.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(keyword) {
            return false;
        }
        match rest[keyword.len()..].chars().next() {
            Some(c) if is_name_char(c) => false,
            _ => {
                self.pos += keyword.len();
                true
            }
        }
    }

    fn error(&self, message: &str) -> ModelError {
        ModelError::TypeExpr {
            package: self.package_path.clone(),
            expr: self.src.to_string(),
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn parse_type(&mut self) -> Result<TypeId, ModelError> {
        self.skip_ws();
        if self.eat("*") {
            let elem = self.parse_type()?;
            return Ok(self.universe.pointer(elem));
        }
        if self.eat("(") {
            let inner = self.parse_type()?;
            self.expect(")")?;
            return Ok(inner);
        }
        if self.eat("[") {
            if self.eat("]") {
                let elem = self.parse_type()?;
                return Ok(self.universe.slice(elem));
            }
            let len = self.parse_array_len()?;
            self.expect("]")?;
            let elem = self.parse_type()?;
            return Ok(self.universe.array(len, elem));
        }
        if self.eat("<-") {
            if !self.eat_keyword("chan") {
                return Err(self.error("expected `chan` after `<-`"));
            }
            let elem = self.parse_type()?;
            return Ok(self.universe.chan(elem));
        }
        if self.eat_keyword("map") {
            self.expect("[")?;
            let key = self.parse_type()?;
            self.expect("]")?;
            let value = self.parse_type()?;
            return Ok(self.universe.map(key, value));
        }
        if self.eat_keyword("chan") {
            self.eat("<-");
            let elem = self.parse_type()?;
            return Ok(self.universe.chan(elem));
        }
        if self.eat_keyword("func") {
            return self.parse_func();
        }
        if self.eat_keyword("interface") {
            self.expect("{")?;
            if self.eat("}") {
                return Ok(TypeId::EMPTY_INTERFACE);
            }
            return Err(self.error("only the empty interface literal is supported"));
        }
        if self.eat_keyword("struct") {
            return self.parse_struct();
        }
        self.parse_named()
    }

    fn parse_array_len(&mut self) -> Result<u64, ModelError> {
        self.skip_ws();
        let digits = self.rest().chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return Err(self.error("expected array length"));
        }
        let len = self.rest()[..digits]
            .parse()
            .map_err(|_| self.error("array length out of range"))?;
        self.pos += digits;
        Ok(len)
    }

    fn name_token(&mut self) -> Result<&str, ModelError> {
        self.skip_ws();
        let len: usize = self
            .rest()
            .chars()
            .take_while(|&c| is_name_char(c))
            .map(char::len_utf8)
            .sum();
        if len == 0 {
            return Err(self.error("expected a type"));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.src[start..start + len])
    }

    fn parse_named(&mut self) -> Result<TypeId, ModelError> {
        let start = self.pos;
        let token = self.name_token()?.to_string();
        if self.rest().starts_with('[') {
            return Err(self.error("instantiated generic types are not supported"));
        }

        if !token.contains('.') {
            if let Some(id) = TypeId::predeclared(&token) {
                return Ok(id);
            }
            if self.scope.type_params.iter().any(|p| *p == token) {
                return Ok(self.universe.type_param(token));
            }
            let qualified = QualifiedName::new(self.package_path.clone(), token);
            return self.resolve_declared(&qualified);
        }

        let Some(qualified) = QualifiedName::parse(&token) else {
            self.pos = start;
            return Err(self.error("malformed qualified type name"));
        };
        if self.universe.package_by_path(&qualified.package).is_some() {
            return self.resolve_declared(&qualified);
        }
        Ok(self.universe.reference_external(qualified))
    }

    fn resolve_declared(&self, qualified: &QualifiedName) -> Result<TypeId, ModelError> {
        self.universe
            .lookup(qualified)
            .ok_or_else(|| ModelError::UnknownType {
                package: qualified.package.clone(),
                name: qualified.name.clone(),
                context: self.src.to_string(),
            })
    }

    /// Function types are opaque; only their spelling is kept.
    fn parse_func(&mut self) -> Result<TypeId, ModelError> {
        let start = self.pos - "func".len();
        self.skip_ws();
        if !self.rest().starts_with('(') {
            return Err(self.error("expected `(` after `func`"));
        }
        self.skip_balanced()?;
        self.skip_inline_ws();
        match self.peek() {
            Some('(') => self.skip_balanced()?,
            None | Some(';' | '}' | ']' | ',' | ')' | '\n') => {}
            Some(_) => {
                self.parse_type()?;
            }
        }
        let signature = self.src[start..self.pos].trim().to_string();
        Ok(self.universe.func(signature))
    }

    fn skip_balanced(&mut self) -> Result<(), ModelError> {
        let mut depth = 0usize;
        for (offset, c) in self.rest().char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += offset + 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(self.error("unbalanced parentheses"))
    }

    fn parse_struct(&mut self) -> Result<TypeId, ModelError> {
        self.expect("{")?;
        let mut fields = Vec::new();
        loop {
            self.skip_ws();
            while self.eat(";") {}
            if self.eat("}") {
                break;
            }
            if self.peek().is_none() {
                return Err(self.error("unterminated struct literal"));
            }
            self.parse_field_decl(&mut fields)?;
            self.skip_inline_ws();
            if matches!(self.peek(), Some('`' | '"')) {
                self.skip_tag()?;
            }
            self.skip_inline_ws();
            match self.peek() {
                Some(';' | '\n') => self.pos += 1,
                Some('}') => {}
                _ => return Err(self.error("expected `;` or `}` after field")),
            }
        }
        Ok(self.universe.anonymous_struct(fields))
    }

    fn parse_field_decl(&mut self, fields: &mut Vec<Field>) -> Result<(), ModelError> {
        self.skip_ws();
        if self.peek() == Some('*') {
            let ty = self.parse_type()?;
            fields.push(self.embedded_field(ty));
            return Ok(());
        }

        let start = self.pos;
        let first = self.name_token()?.to_string();
        self.skip_inline_ws();
        if matches!(self.peek(), None | Some(';' | '}' | '\n' | '`' | '"')) {
            self.pos = start;
            let ty = self.parse_named()?;
            fields.push(self.embedded_field(ty));
            return Ok(());
        }

        let mut names = vec![first];
        while self.eat(",") {
            names.push(self.name_token()?.to_string());
        }
        let ty = self.parse_type()?;
        for name in names {
            fields.push(Field::new(name, ty));
        }
        Ok(())
    }

    fn embedded_field(&self, ty: TypeId) -> Field {
        let target = match self.universe.kind(ty) {
            TypeKind::Pointer { elem } => *elem,
            _ => ty,
        };
        let name = self
            .universe
            .name(target)
            .map_or_else(String::new, |n| n.name.clone());
        Field::new(name, ty).embedded()
    }

    fn skip_tag(&mut self) -> Result<(), ModelError> {
        let Some(quote) = self.peek() else {
            return Ok(());
        };
        let body = &self.rest()[1..];
        let end = if quote == '`' {
            body.find('`')
        } else {
            body.find('"')
        };
        match end {
            Some(end) => {
                self.pos += end + 2;
                Ok(())
            }
            None => Err(self.error("unterminated field tag")),
        }
    }
}

#[cfg(test)]
mod tests;
