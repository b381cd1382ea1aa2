mod coord;
