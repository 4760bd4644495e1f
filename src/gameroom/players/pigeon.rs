use crate::gameroom::Bot;
use crate::gameplay::Engine;
use crate::gameplay::Move;
use rand::seq::IndexedRandom;

/// Example CPU opponent that plays uniformly at random, restricted to
/// moves that keep the maximal dice use reachable so it never strands a
/// usable die. Takes roughly half the doubles it is shown.
pub struct Pigeon;

#[async_trait::async_trait]
impl Bot for Pigeon {
    fn name(&self) -> &'static str {
        "pigeon"
    }

    async fn choose(&mut self, view: &Engine) -> Vec<Move> {
        let ref mut rng = rand::rng();
        let mut scratch = view.clone();
        let mut moves = Vec::new();
        while let Some(m) = scratch.optimal().choose(rng).copied() {
            scratch.play(m).expect("optimal move plays on a clone");
            moves.push(m);
            if scratch.result().is_some() {
                break;
            }
        }
        moves
    }

    async fn take_double(&mut self, _: &Engine) -> bool {
        rand::random::<bool>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pigeon_fills_the_roll() {
        let mut engine = Engine::seeded(11);
        engine.reseed(6, 5);
        engine.open().expect("open");
        let mut pigeon = Pigeon;
        let moves = pigeon.choose(&engine).await;
        assert_eq!(moves.len(), 2);
        for m in moves {
            engine.play(m).expect("chosen moves replay");
        }
        assert!(engine.pass().is_ok());
    }

    #[tokio::test]
    async fn pigeon_never_strands_a_die() {
        for seed in 0..10 {
            let mut engine = Engine::seeded(seed);
            engine.open().expect("open");
            let mut pigeon = Pigeon;
            for _ in 0..50 {
                if engine.result().is_some() {
                    break;
                }
                if engine.rolled().is_none() {
                    engine.throw().expect("roll");
                }
                for m in pigeon.choose(&engine).await {
                    engine.play(m).expect("replay");
                }
                if engine.result().is_none() {
                    engine.pass().expect("maximal sequence always ends cleanly");
                }
            }
        }
    }
}
