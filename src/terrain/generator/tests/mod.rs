mod heightmap_tests;
