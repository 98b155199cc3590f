use ramo::ast::{BinaryOp, Function, Location, Param, Term};

fn loc() -> Location {
    Location {
        start: 0,
        end: 0,
        filename: "test".to_string(),
    }
}

fn param(text: &str) -> Param {
    Param {
        text: text.to_string(),
        location: loc(),
    }
}

pub fn int(value: i64) -> Term {
    Term::Int {
        value,
        location: loc(),
    }
}

pub fn str_(value: &str) -> Term {
    Term::Str {
        value: value.to_string(),
        location: loc(),
    }
}

pub fn boolean(value: bool) -> Term {
    Term::Bool {
        value,
        location: loc(),
    }
}

pub fn var(text: &str) -> Term {
    Term::Var {
        text: text.to_string(),
        location: loc(),
    }
}

pub fn tuple(first: Term, second: Term) -> Term {
    Term::Tuple {
        first: Box::new(first),
        second: Box::new(second),
        location: loc(),
    }
}

pub fn first(value: Term) -> Term {
    Term::First {
        value: Box::new(value),
        location: loc(),
    }
}

pub fn second(value: Term) -> Term {
    Term::Second {
        value: Box::new(value),
        location: loc(),
    }
}

pub fn binary(op: BinaryOp, lhs: Term, rhs: Term) -> Term {
    Term::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        location: loc(),
    }
}

pub fn if_(condition: Term, then: Term, otherwise: Term) -> Term {
    Term::If {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
        location: loc(),
    }
}

pub fn print(value: Term) -> Term {
    Term::Print {
        value: Box::new(value),
        location: loc(),
    }
}

pub fn let_(name: &str, value: Term, next: Term) -> Term {
    Term::Let {
        name: param(name),
        value: Box::new(value),
        next: Box::new(next),
        location: loc(),
    }
}

pub fn function(params: &[&str], body: Term) -> Term {
    Term::Function(Function {
        parameters: params.iter().map(|text| param(text)).collect(),
        value: Box::new(body),
        location: loc(),
    })
}

pub fn call(callee: Term, arguments: Vec<Term>) -> Term {
    Term::Call {
        callee: Box::new(callee),
        arguments,
        location: loc(),
    }
}
