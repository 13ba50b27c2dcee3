//! Small constructors over `swc_ecma_ast` nodes.
//!
//! The lowerer and the harness emitter synthesize a fair amount of AST; these
//! helpers keep that construction flat. All synthesized nodes carry dummy
//! spans and an empty syntax context.

use swc_common::DUMMY_SP;
use swc_ecma_ast::*;

pub fn ident(sym: &str) -> Ident {
    Ident::new(sym.into(), DUMMY_SP, Default::default())
}

pub fn ident_expr(sym: &str) -> Expr {
    Expr::Ident(ident(sym))
}

pub fn ident_name(sym: &str) -> IdentName {
    IdentName {
        span: DUMMY_SP,
        sym: sym.into(),
    }
}

pub fn binding(sym: &str) -> Pat {
    Pat::Ident(BindingIdent {
        id: ident(sym),
        type_ann: None,
    })
}

pub fn str_lit(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

pub fn num_lit(value: f64) -> Expr {
    Expr::Lit(Lit::Num(Number {
        span: DUMMY_SP,
        value,
        raw: None,
    }))
}

pub fn bool_lit(value: bool) -> Expr {
    Expr::Lit(Lit::Bool(Bool {
        span: DUMMY_SP,
        value,
    }))
}

/// `void 0`, the canonical `undefined`.
pub fn undefined() -> Expr {
    Expr::Unary(UnaryExpr {
        span: DUMMY_SP,
        op: UnaryOp::Void,
        arg: Box::new(num_lit(0.0)),
    })
}

pub fn not(arg: Expr) -> Expr {
    Expr::Unary(UnaryExpr {
        span: DUMMY_SP,
        op: UnaryOp::Bang,
        arg: Box::new(arg),
    })
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn cond(test: Expr, cons: Expr, alt: Expr) -> Expr {
    Expr::Cond(CondExpr {
        span: DUMMY_SP,
        test: Box::new(test),
        cons: Box::new(cons),
        alt: Box::new(alt),
    })
}

/// `obj.prop`
pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(ident_name(prop)),
    })
}

/// `obj[prop]`
pub fn computed_member(obj: Expr, prop: Expr) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(prop),
        }),
    })
}

/// `obj.name` when `name` is a valid identifier, `obj["name"]` otherwise.
pub fn member_or_indexed(obj: Expr, name: &str) -> Expr {
    if is_ident_name(name) {
        member(obj, name)
    } else {
        computed_member(obj, str_lit(name))
    }
}

fn is_ident_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        ctxt: Default::default(),
        callee: Callee::Expr(Box::new(callee)),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread {
                spread: None,
                expr: Box::new(expr),
            })
            .collect(),
        type_args: None,
    })
}

pub fn new_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::New(NewExpr {
        span: DUMMY_SP,
        ctxt: Default::default(),
        callee: Box::new(callee),
        args: Some(
            args.into_iter()
                .map(|expr| ExprOrSpread {
                    spread: None,
                    expr: Box::new(expr),
                })
                .collect(),
        ),
        type_args: None,
    })
}

/// `target = value`
pub fn assign(target: Expr, value: Expr) -> Expr {
    let left = match target {
        Expr::Member(member) => AssignTarget::Simple(SimpleAssignTarget::Member(member)),
        Expr::Ident(id) => AssignTarget::Simple(SimpleAssignTarget::Ident(BindingIdent {
            id,
            type_ann: None,
        })),
        other => AssignTarget::Simple(SimpleAssignTarget::Paren(ParenExpr {
            span: DUMMY_SP,
            expr: Box::new(other),
        })),
    };
    Expr::Assign(AssignExpr {
        span: DUMMY_SP,
        op: AssignOp::Assign,
        left,
        right: Box::new(value),
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(expr),
    })
}

/// `var name = init;`
pub fn var_stmt(name: &str, init: Option<Expr>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        ctxt: Default::default(),
        kind: VarDeclKind::Var,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: binding(name),
            init: init.map(Box::new),
            definite: false,
        }],
    })))
}

pub fn return_stmt(arg: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt {
        span: DUMMY_SP,
        arg: arg.map(Box::new),
    })
}

pub fn throw_stmt(arg: Expr) -> Stmt {
    Stmt::Throw(ThrowStmt {
        span: DUMMY_SP,
        arg: Box::new(arg),
    })
}

pub fn if_stmt(test: Expr, cons: Stmt) -> Stmt {
    Stmt::If(IfStmt {
        span: DUMMY_SP,
        test: Box::new(test),
        cons: Box::new(cons),
        alt: None,
    })
}

/// `for (var name in obj) body`
pub fn for_in_stmt(name: &str, obj: Expr, body: Stmt) -> Stmt {
    Stmt::ForIn(ForInStmt {
        span: DUMMY_SP,
        left: ForHead::VarDecl(Box::new(VarDecl {
            span: DUMMY_SP,
            ctxt: Default::default(),
            kind: VarDeclKind::Var,
            declare: false,
            decls: vec![VarDeclarator {
                span: DUMMY_SP,
                name: binding(name),
                init: None,
                definite: false,
            }],
        })),
        right: Box::new(obj),
        body: Box::new(body),
    })
}

pub fn empty_object() -> Expr {
    Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: Vec::new(),
    })
}

pub fn empty_array() -> Expr {
    Expr::Array(ArrayLit {
        span: DUMMY_SP,
        elems: Vec::new(),
    })
}

pub fn object(props: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: props
            .into_iter()
            .map(|(key, value)| {
                PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
                    key: PropName::Ident(ident_name(key)),
                    value: Box::new(value),
                })))
            })
            .collect(),
    })
}

pub fn this_expr() -> Expr {
    Expr::This(ThisExpr { span: DUMMY_SP })
}

/// Anonymous `function (params) { body }`.
pub fn fn_expr(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Fn(FnExpr {
        ident: None,
        function: Box::new(function(params, body)),
    })
}

/// `function name(params) { body }` as a statement.
pub fn fn_decl(name: &str, params: &[&str], body: Vec<Stmt>) -> Stmt {
    Stmt::Decl(Decl::Fn(FnDecl {
        ident: ident(name),
        declare: false,
        function: Box::new(function(params, body)),
    }))
}

fn function(params: &[&str], body: Vec<Stmt>) -> Function {
    Function {
        params: params
            .iter()
            .map(|name| Param {
                span: DUMMY_SP,
                decorators: Vec::new(),
                pat: binding(name),
            })
            .collect(),
        decorators: Vec::new(),
        span: DUMMY_SP,
        ctxt: Default::default(),
        body: Some(BlockStmt {
            span: DUMMY_SP,
            ctxt: Default::default(),
            stmts: body,
        }),
        is_generator: false,
        is_async: false,
        type_params: None,
        return_type: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ident_name() {
        assert!(is_ident_name("foo"));
        assert!(is_ident_name("_private"));
        assert!(is_ident_name("$jq"));
        assert!(is_ident_name("camelCase2"));
        assert!(!is_ident_name(""));
        assert!(!is_ident_name("2fast"));
        assert!(!is_ident_name("has space"));
        assert!(!is_ident_name("dash-ed"));
    }

    #[test]
    fn test_member_or_indexed_picks_computed() {
        let plain = member_or_indexed(ident_expr("exports"), "foo");
        assert!(matches!(
            plain,
            Expr::Member(MemberExpr {
                prop: MemberProp::Ident(_),
                ..
            })
        ));

        let quoted = member_or_indexed(ident_expr("exports"), "not an ident");
        assert!(matches!(
            quoted,
            Expr::Member(MemberExpr {
                prop: MemberProp::Computed(_),
                ..
            })
        ));
    }
}
