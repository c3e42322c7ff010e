//! Slice reducers

/// Pure `(state, signal) -> next state` function for one slice
///
/// The current state is borrowed, so a reducer can only produce a new
/// state, never change the one it was given.
pub trait Reducer<S, A> {
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S,
{
    #[inline]
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}

/// Type-erased reducer, for maps of differently-built slice reducers
pub type BoxReducer<S, A> = Box<dyn Fn(&S, &A) -> S + Send + Sync>;

/// Erase a reducer's concrete type
pub fn boxed<S, A, R>(reducer: R) -> BoxReducer<S, A>
where
    S: 'static,
    A: 'static,
    R: Reducer<S, A> + Send + Sync + 'static,
{
    Box::new(move |state: &S, action: &A| reducer.reduce(state, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(state: &i64, action: &i64) -> i64 {
        state + action
    }

    #[test]
    fn test_fn_is_reducer() {
        assert_eq!(add.reduce(&1, &2), 3);

        let double = |state: &i64, _: &i64| state * 2;
        assert_eq!(double.reduce(&4, &0), 8);
    }

    #[test]
    fn test_boxed_reducers_share_a_type() {
        let reducers: Vec<BoxReducer<i64, i64>> = vec![boxed(add), boxed(|s: &i64, _: &i64| *s)];
        let results: Vec<i64> = reducers.iter().map(|r| r.reduce(&10, &5)).collect();
        assert_eq!(results, vec![15, 10]);
    }
}
