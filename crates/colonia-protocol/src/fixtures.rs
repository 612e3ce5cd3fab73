//! A small game world shared by the validator and server tests.
//!
//! Built for unit tests and, behind the `test-support` feature, for other
//! crates' integration tests.
//!
//! ```text
//!     x=0   1     2       3      4      5     6
//! y=0  ~    .     .       .      .      .     .
//! y=1  ~    .     w3      E      .      .     .
//! y=2  ~S2  .   [NA]S1    C    (camp)   .     .
//! y=3  ~    .     .       .      .      .     .
//! y=4  ~    .     .       .      .      En    .
//! ```
//!
//! `~` ocean, `[NA]` New Amsterdam, `camp` the Arawak settlement,
//! `C` a free colonist, `E` an expert farmer, `S1` a ship in port carrying
//! a passenger, `S2` a ship at sea carrying a passenger, `w3` a worker on a
//! colony tile, `En` an English colonist.

use colonia_model::{
    Building, Colony, Game, GoodsType, Id, Location, Player, Role, Settlement,
    Specification, Tile, TradeRoute, Unit,
};

pub struct World {
    pub game: Game,
    pub dutch: Id<Player>,
    pub english: Id<Player>,
    pub colony: Id<Colony>,
    pub town_hall: Id<Building>,
    pub carpenter: Id<Building>,
    pub church: Id<Building>,
    pub settlement: Id<Settlement>,
    pub colonist: Id<Unit>,
    pub expert: Id<Unit>,
    pub ship: Id<Unit>,
    pub passenger: Id<Unit>,
    pub sea_passenger: Id<Unit>,
    pub workers: [Id<Unit>; 3],
    pub english_unit: Id<Unit>,
    pub dutch_route: Id<TradeRoute>,
    pub english_route: Id<TradeRoute>,
}

impl World {
    pub fn new() -> Self {
        let mut game = Game::new(Specification::classic(), 7, 5);
        for y in 0..5 {
            for x in 1..7 {
                let id = game.tile_at(x, y).unwrap().id.clone();
                game.set_land(&id, true).unwrap();
            }
        }

        let dutch = game.add_player("Dutch");
        let english = game.add_player("English");
        let arawak = game.add_player("Arawak");

        let colony = game.add_colony(&dutch, "New Amsterdam", &tile(&game, 2, 2)).unwrap();
        let town_hall = game.add_building(&colony, "model.building.townHall").unwrap();
        let carpenter = game
            .add_building(&colony, "model.building.carpenterHouse")
            .unwrap();
        let church = game.add_building(&colony, "model.building.church").unwrap();

        let settlement = game
            .add_settlement(
                &arawak,
                "Guanahani",
                &tile(&game, 4, 2),
                Some("model.unit.expertFarmer"),
            )
            .unwrap();

        let colonist = {
            let loc = at(&game, 3, 2);
            unit(&mut game, &dutch, "model.unit.freeColonist", loc)
        };
        let expert = {
            let loc = at(&game, 3, 1);
            unit(&mut game, &dutch, "model.unit.expertFarmer", loc)
        };

        let ship = {
            let loc = at(&game, 2, 2);
            unit(&mut game, &dutch, "model.unit.caravel", loc)
        };
        let passenger = unit(
            &mut game,
            &dutch,
            "model.unit.freeColonist",
            Location::Carrier(ship.clone()),
        );
        let sea_ship = {
            let loc = at(&game, 0, 2);
            unit(&mut game, &dutch, "model.unit.caravel", loc)
        };
        let sea_passenger = unit(
            &mut game,
            &dutch,
            "model.unit.freeColonist",
            Location::Carrier(sea_ship),
        );

        let w1 = worker(
            &mut game,
            &dutch,
            Location::Building(town_hall.clone()),
            "model.goods.bells",
        );
        let w2 = worker(
            &mut game,
            &dutch,
            Location::Building(carpenter.clone()),
            "model.goods.hammers",
        );
        let w3 = {
            let loc = at(&game, 2, 1);
            worker(&mut game, &dutch, loc, "model.goods.food")
        };

        let english_unit = {
            let loc = at(&game, 5, 4);
            unit(&mut game, &english, "model.unit.freeColonist", loc)
        };

        let dutch_route = game.add_trade_route(&dutch, "Sugar run").unwrap();
        let english_route = game.add_trade_route(&english, "Fur run").unwrap();

        Self {
            game,
            dutch,
            english,
            colony,
            town_hall,
            carpenter,
            church,
            settlement,
            colonist,
            expert,
            ship,
            passenger,
            sea_passenger,
            workers: [w1, w2, w3],
            english_unit,
            dutch_route,
            english_route,
        }
    }

    pub fn tile(&self, x: u32, y: u32) -> Id<Tile> {
        tile(&self.game, x, y)
    }

    pub fn unit(&self, id: &Id<Unit>) -> &Unit {
        self.game.get(id).unwrap()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn tile(game: &Game, x: u32, y: u32) -> Id<Tile> {
    game.tile_at(x, y).unwrap().id.clone()
}

fn at(game: &Game, x: u32, y: u32) -> Location {
    Location::Tile(tile(game, x, y))
}

fn unit(game: &mut Game, owner: &Id<Player>, unit_type: &str, location: Location) -> Id<Unit> {
    game.add_unit(owner, unit_type, location).unwrap()
}

fn worker(game: &mut Game, owner: &Id<Player>, location: Location, work: &str) -> Id<Unit> {
    let id = unit(game, owner, "model.unit.freeColonist", location);
    let u = game.get_mut(&id).unwrap();
    u.work = Some(Id::<GoodsType>::new(work));
    u.role = Id::<Role>::new(Role::DEFAULT);
    id
}
